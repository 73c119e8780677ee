//! Desugars the sugared algebra into the minimal core: wildcards are
//! expanded against the schema oracle, aliases are lifted into explicit
//! renames, and every join kind is re-expressed through `Cross`, `Sigma`,
//! `Pi` and `Rho` (outer joins keep a marked construct of their own).
//!
//! The rewrite is a bottom-up recursion threading a [`Scope`]: the mapping
//! from in-query relation names to their ordered column lists. For a fixed
//! oracle the output is a pure function of the input; synthesized names are
//! derived from printed expressions, never from global state.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::catalog::SchemaOracle;
use crate::ir::{
    ColumnRef, Expr, JoinCondition, JoinKind, OuterJoinKind, ProjectItem, Ra, Sra,
};

/// Failures while lowering a query against a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DesugarError {
    #[error("unknown table `{0}`")]
    UnknownTable(String),
    #[error("wildcard expansion over `{0}` produced no columns")]
    EmptyExpansion(String),
    #[error("column `{0}` is ambiguous in this scope")]
    AmbiguousColumn(String),
    #[error("column `{0}` cannot be resolved to a relation in this scope")]
    UnresolvedColumn(String),
    #[error("relation name `{0}` appears twice in this scope")]
    DuplicateRelation(String),
    #[error("USING column `{column}` is missing from the {side} operand")]
    UnknownUsingColumn { column: String, side: &'static str },
    #[error("{0} join requires a join condition")]
    MissingJoinCondition(&'static str),
    #[error("wildcard reference outside a projection position")]
    StrayWildcard,
    #[error("{0} has no lowering yet")]
    Unsupported(&'static str),
}

/// The desugarer's bookkeeping: which relations are visible, under which
/// names, and which bare column names they contribute, in declared order.
#[derive(Debug, Clone, Default)]
struct Scope {
    relations: IndexMap<String, Vec<String>>,
    /// All visible columns in order, used to expand the bare `*`.
    output: Vec<String>,
}

impl Scope {
    fn relation(name: String, columns: Vec<String>) -> Self {
        let output = columns.clone();
        let mut relations = IndexMap::new();
        relations.insert(name, columns);
        Self { relations, output }
    }

    /// Disjoint union of two scopes; overlapping relation names are an
    /// error, overlapping column names only become one once a bare `*`
    /// forces their expansion.
    fn merge(mut self, other: Scope) -> Result<Scope, DesugarError> {
        for (name, columns) in other.relations {
            if self.relations.insert(name.clone(), columns).is_some() {
                return Err(DesugarError::DuplicateRelation(name));
            }
        }
        self.output.extend(other.output);
        Ok(self)
    }

    fn columns_of(&self, relation: &str) -> Option<&[String]> {
        self.relations.get(relation).map(Vec::as_slice)
    }

    /// The unique relation contributing `column`.
    fn relation_of_column(&self, column: &str) -> Result<&str, DesugarError> {
        let mut owners = self
            .relations
            .iter()
            .filter(|(_, columns)| columns.iter().any(|c| c == column))
            .map(|(name, _)| name.as_str());

        let first = owners
            .next()
            .ok_or_else(|| DesugarError::UnresolvedColumn(column.to_string()))?;
        match owners.next() {
            Some(_) => Err(DesugarError::AmbiguousColumn(column.to_string())),
            None => Ok(first),
        }
    }
}

/// Desugars a sugared query tree against the passed schema oracle.
///
/// The input is borrowed and left untouched; the output is a fresh tree
/// sharing no structure with it.
pub fn desugar(sra: &Sra, oracle: &dyn SchemaOracle) -> Result<Ra, DesugarError> {
    tracing::debug!(input = %sra, "desugaring query");
    desugar_scoped(sra, oracle).map(|(ra, _)| ra)
}

fn desugar_scoped(sra: &Sra, oracle: &dyn SchemaOracle) -> Result<(Ra, Scope), DesugarError> {
    match sra {
        Sra::Table { name, alias } => desugar_table(name, alias.as_deref(), oracle),
        Sra::Join {
            kind,
            condition,
            left,
            right,
        } => desugar_join(*kind, condition, left, right, oracle),
        Sra::Select { predicate, child } => {
            let (child_ra, scope) = desugar_scoped(child, oracle)?;
            if predicate.has_stray_wildcard() {
                return Err(DesugarError::StrayWildcard);
            }
            let predicate = lower_subqueries(predicate, oracle)?;
            Ok((Ra::sigma(predicate, child_ra), scope))
        }
        Sra::Project {
            distinct,
            items,
            group_by,
            having,
            limit,
            child,
        } => {
            if !group_by.is_empty() {
                return Err(DesugarError::Unsupported("GROUP BY"));
            }
            if having.is_some() {
                return Err(DesugarError::Unsupported("HAVING"));
            }
            if limit.is_some() {
                return Err(DesugarError::Unsupported("LIMIT"));
            }
            desugar_project(*distinct, items, child, oracle)
        }
        Sra::OrderBy {
            column,
            direction,
            child,
        } => {
            let (child_ra, scope) = desugar_scoped(child, oracle)?;
            Ok((
                Ra::OrderBy {
                    column: column.clone(),
                    direction: *direction,
                    child: Box::new(child_ra),
                },
                scope,
            ))
        }
        Sra::SetOp { kind, left, right } => {
            let (left_ra, scope) = desugar_scoped(left, oracle)?;
            let (right_ra, _) = desugar_scoped(right, oracle)?;
            Ok((
                Ra::SetOp {
                    kind: *kind,
                    left: Box::new(left_ra),
                    right: Box::new(right_ra),
                },
                scope,
            ))
        }
    }
}

fn desugar_table(
    name: &str,
    alias: Option<&str>,
    oracle: &dyn SchemaOracle,
) -> Result<(Ra, Scope), DesugarError> {
    let columns = oracle
        .columns_of(name)
        .ok_or_else(|| DesugarError::UnknownTable(name.to_string()))?
        .to_vec();

    let visible = alias.unwrap_or(name).to_string();
    let scope = Scope::relation(visible, columns);

    let ra = match alias {
        Some(alias) => Ra::rho_table(alias, Ra::table(name)),
        None => Ra::table(name),
    };
    Ok((ra, scope))
}

fn desugar_join(
    kind: JoinKind,
    condition: &JoinCondition,
    left: &Sra,
    right: &Sra,
    oracle: &dyn SchemaOracle,
) -> Result<(Ra, Scope), DesugarError> {
    let (left_ra, left_scope) = desugar_scoped(left, oracle)?;
    let (right_ra, right_scope) = desugar_scoped(right, oracle)?;

    match kind {
        JoinKind::Inner | JoinKind::Cross => match condition {
            JoinCondition::On(on) => {
                if on.has_stray_wildcard() {
                    return Err(DesugarError::StrayWildcard);
                }
                let on = lower_subqueries(on, oracle)?;
                let scope = left_scope.merge(right_scope)?;
                Ok((Ra::sigma(on, Ra::cross(left_ra, right_ra)), scope))
            }
            JoinCondition::Using(columns) => {
                merge_join(left_ra, right_ra, left_scope, right_scope, Some(columns))
            }
            JoinCondition::None => {
                let scope = left_scope.merge(right_scope)?;
                Ok((Ra::cross(left_ra, right_ra), scope))
            }
        },
        JoinKind::Natural => match condition {
            JoinCondition::On(_) => Err(DesugarError::Unsupported(
                "NATURAL join with an explicit condition",
            )),
            JoinCondition::Using(columns) => {
                merge_join(left_ra, right_ra, left_scope, right_scope, Some(columns))
            }
            JoinCondition::None => {
                merge_join(left_ra, right_ra, left_scope, right_scope, None)
            }
        },
        JoinKind::LeftOuter | JoinKind::RightOuter | JoinKind::FullOuter => {
            let outer_kind = match kind {
                JoinKind::LeftOuter => OuterJoinKind::Left,
                JoinKind::RightOuter => OuterJoinKind::Right,
                _ => OuterJoinKind::Full,
            };
            let condition = match condition {
                JoinCondition::On(on) => {
                    if on.has_stray_wildcard() {
                        return Err(DesugarError::StrayWildcard);
                    }
                    lower_subqueries(on, oracle)?
                }
                // USING on an outer join contributes the equality
                // conjunction only; the null-padded side keeps its columns
                // for a later stage to reconcile.
                JoinCondition::Using(columns) => {
                    validate_using(columns, &left_scope, &right_scope)?;
                    equijoin_condition(columns, &left_scope, &right_scope)?
                }
                JoinCondition::None => {
                    return Err(DesugarError::MissingJoinCondition(match outer_kind {
                        OuterJoinKind::Left => "LEFT OUTER",
                        OuterJoinKind::Right => "RIGHT OUTER",
                        OuterJoinKind::Full => "FULL OUTER",
                    }))
                }
            };
            let scope = left_scope.merge(right_scope)?;
            Ok((
                Ra::OuterJoin {
                    kind: outer_kind,
                    condition,
                    left: Box::new(left_ra),
                    right: Box::new(right_ra),
                },
                scope,
            ))
        }
    }
}

/// Rewrites a natural join (or a `USING` restriction of one) as
/// `Pi(merged, Sigma(conj, Cross(..)))`. Shared columns appear once, then
/// the remaining columns of the left and right operands in declared order.
fn merge_join(
    left_ra: Ra,
    right_ra: Ra,
    left_scope: Scope,
    right_scope: Scope,
    using: Option<&[String]>,
) -> Result<(Ra, Scope), DesugarError> {
    let shared: Vec<String> = match using {
        Some(columns) => {
            validate_using(columns, &left_scope, &right_scope)?;
            columns.to_vec()
        }
        // Declared order of the left operand keeps the output
        // deterministic.
        None => left_scope
            .output
            .iter()
            .filter(|column| right_scope.output.contains(column))
            .cloned()
            .collect(),
    };

    if shared.is_empty() {
        let scope = left_scope.merge(right_scope)?;
        return Ok((Ra::cross(left_ra, right_ra), scope));
    }

    let condition = equijoin_condition(&shared, &left_scope, &right_scope)?;

    let mut attributes: Vec<ColumnRef> = shared.iter().map(ColumnRef::new).collect();
    attributes.extend(
        left_scope
            .output
            .iter()
            .filter(|column| !shared.contains(column))
            .map(ColumnRef::new),
    );
    attributes.extend(
        right_scope
            .output
            .iter()
            .filter(|column| !shared.contains(column))
            .map(ColumnRef::new),
    );

    let ra = Ra::pi(
        attributes.clone(),
        Ra::sigma(condition, Ra::cross(left_ra, right_ra)),
    );

    let output = attributes.iter().map(|attr| attr.name.clone()).collect();
    let mut scope = left_scope.merge(right_scope)?;
    scope.output = output;

    Ok((ra, scope))
}

fn validate_using(
    columns: &[String],
    left: &Scope,
    right: &Scope,
) -> Result<(), DesugarError> {
    for column in columns {
        if !left.output.contains(column) {
            return Err(DesugarError::UnknownUsingColumn {
                column: column.clone(),
                side: "left",
            });
        }
        if !right.output.contains(column) {
            return Err(DesugarError::UnknownUsingColumn {
                column: column.clone(),
                side: "right",
            });
        }
    }
    Ok(())
}

/// Conjoins `L.c = R.c` over the shared columns, left-associatively.
fn equijoin_condition(
    shared: &[String],
    left: &Scope,
    right: &Scope,
) -> Result<Expr, DesugarError> {
    let mut condition: Option<Expr> = None;
    for column in shared {
        let left_relation = left.relation_of_column(column)?;
        let right_relation = right.relation_of_column(column)?;
        let equality = Expr::binary(
            crate::ir::BinaryOp::Eq,
            Expr::qualified(left_relation, column),
            Expr::qualified(right_relation, column),
        );
        condition = Some(match condition {
            None => equality,
            Some(acc) => Expr::binary(crate::ir::BinaryOp::And, acc, equality),
        });
    }
    condition.ok_or(DesugarError::UnresolvedColumn(String::new()))
}

/// One projection item after wildcard expansion.
enum Expanded {
    Plain(ColumnRef),
    Computed { expr: Expr, alias: Option<String> },
}

fn desugar_project(
    distinct: bool,
    items: &[ProjectItem],
    child: &Sra,
    oracle: &dyn SchemaOracle,
) -> Result<(Ra, Scope), DesugarError> {
    let (child_ra, scope) = desugar_scoped(child, oracle)?;

    // Step 1: expand wildcards against the scope.
    let mut expanded = Vec::new();
    for item in items {
        match item {
            ProjectItem::Wildcard => {
                if scope.output.is_empty() {
                    return Err(DesugarError::EmptyExpansion("*".to_string()));
                }
                if let Some(duplicate) = first_duplicate(&scope.output) {
                    return Err(DesugarError::AmbiguousColumn(duplicate));
                }
                for column in &scope.output {
                    expanded.push(Expanded::Plain(ColumnRef::new(column)));
                }
            }
            ProjectItem::QualifiedWildcard(relation) => {
                let columns = scope
                    .columns_of(relation)
                    .ok_or_else(|| DesugarError::UnknownTable(relation.clone()))?;
                if columns.is_empty() {
                    return Err(DesugarError::EmptyExpansion(relation.clone()));
                }
                for column in columns {
                    expanded.push(Expanded::Plain(
                        ColumnRef::new(column).with_qualifier(relation),
                    ));
                }
            }
            ProjectItem::Expr { expr, alias } => match (expr, alias) {
                // Step 2: plain unaliased references pass through.
                (Expr::Column(column), None) if !column.is_wildcard() => {
                    expanded.push(Expanded::Plain(column.clone()));
                }
                (expr, alias) => {
                    if expr.has_stray_wildcard() {
                        return Err(DesugarError::StrayWildcard);
                    }
                    expanded.push(Expanded::Computed {
                        expr: lower_subqueries(expr, oracle)?,
                        alias: alias.clone(),
                    });
                }
            },
        }
    }

    // Step 4 bookkeeping: names a synthesized alias must avoid.
    let mut taken: HashSet<String> = scope.output.iter().cloned().collect();
    for entry in &expanded {
        match entry {
            Expanded::Plain(column) => {
                taken.insert(column.to_string());
            }
            Expanded::Computed {
                alias: Some(alias), ..
            } => {
                taken.insert(alias.clone());
            }
            Expanded::Computed { .. } => {}
        }
    }

    struct Out {
        attr: ColumnRef,
        inner: ColumnRef,
        computed: Option<(Expr, String)>,
    }

    let mut outs = Vec::new();
    for entry in expanded {
        match entry {
            Expanded::Plain(column) => outs.push(Out {
                attr: column.clone(),
                inner: column,
                computed: None,
            }),
            Expanded::Computed { expr, alias } => {
                let name = match alias {
                    Some(alias) => alias,
                    None => synthesize_alias(&expr, &mut taken),
                };
                outs.push(Out {
                    attr: ColumnRef::new(name.clone()),
                    // Until the Rho renames it, the computed column is an
                    // attribute named by its printed form.
                    inner: ColumnRef::new(expr.to_string()),
                    computed: Some((expr, name)),
                });
            }
        }
    }

    // Step 3: emit. Computed items materialize through an inner Pi and a
    // Rho chain (first item innermost); plain projections need one Pi only.
    let out_attrs: Vec<ColumnRef> = outs.iter().map(|out| out.attr.clone()).collect();
    let has_computed = outs.iter().any(|out| out.computed.is_some());

    let ra = if has_computed {
        let inner_attrs: Vec<ColumnRef> = outs.iter().map(|out| out.inner.clone()).collect();
        let mut ra = Ra::pi(inner_attrs, child_ra);
        for out in &outs {
            if let Some((expr, name)) = &out.computed {
                ra = Ra::rho(expr.clone(), name.clone(), ra);
            }
        }
        Ra::Pi {
            distinct,
            attributes: out_attrs.clone(),
            child: Box::new(ra),
        }
    } else {
        Ra::Pi {
            distinct,
            attributes: out_attrs.clone(),
            child: Box::new(child_ra),
        }
    };

    let scope = Scope {
        relations: IndexMap::new(),
        output: out_attrs.into_iter().map(|attr| attr.name).collect(),
    };
    Ok((ra, scope))
}

/// Derives a deterministic attribute name from a printed expression:
/// alphanumeric runs joined by `_`, suffixed on collision.
fn synthesize_alias(expr: &Expr, taken: &mut HashSet<String>) -> String {
    let printed = expr.to_string();
    let mut base = String::new();
    for ch in printed.chars() {
        if ch.is_ascii_alphanumeric() {
            base.push(ch.to_ascii_lowercase());
        } else if !base.is_empty() && !base.ends_with('_') {
            base.push('_');
        }
    }
    let base = base.trim_end_matches('_');
    let base = if base.is_empty() { "expr" } else { base };

    let mut candidate = base.to_string();
    let mut n = 1;
    while taken.contains(&candidate) {
        n += 1;
        candidate = format!("{base}_{n}");
    }
    taken.insert(candidate.clone());
    candidate
}

fn first_duplicate(names: &[String]) -> Option<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .cloned()
}

/// Rewrites `IN`-subqueries inside a predicate by desugaring the subquery
/// recursively; everything else is cloned untouched.
fn lower_subqueries(expr: &Expr, oracle: &dyn SchemaOracle) -> Result<Expr, DesugarError> {
    Ok(match expr {
        Expr::Literal(_) | Expr::Column(_) => expr.clone(),
        Expr::Binary { op, lhs, rhs } => Expr::binary(
            *op,
            lower_subqueries(lhs, oracle)?,
            lower_subqueries(rhs, oracle)?,
        ),
        Expr::Unary { op, expr } => Expr::unary(*op, lower_subqueries(expr, oracle)?),
        Expr::InQuery(needle, subquery) => Expr::InRelation(
            Box::new(lower_subqueries(needle, oracle)?),
            Box::new(desugar(subquery, oracle)?),
        ),
        Expr::InRelation(needle, relation) => Expr::InRelation(
            Box::new(lower_subqueries(needle, oracle)?),
            relation.clone(),
        ),
        Expr::Aggregate { func, arg } => {
            Expr::aggregate(*func, lower_subqueries(arg, oracle)?)
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rowan::ast::AstNode;

    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::ir::{BinaryOp, Statement};

    /// Parses a single query statement into its sugared tree.
    fn parse_query(input: &str) -> Sra {
        let parsed = crate::parse(input);
        assert!(parsed.ok(), "{:?}", parsed.errors);
        let root = crate::ast::Root::cast(parsed.syntax()).unwrap();
        match crate::lower_program(&root).remove(0).unwrap() {
            Statement::Query(sra) => sra,
            other => panic!("expected a query, got {other}"),
        }
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with_table("t", ["w", "x", "y"])
            .with_table("Foo", ["a"])
            .with_table("T", ["a", "b"])
            .with_table("U", ["a", "c"])
            .with_table("t1", ["a"])
            .with_table("t2", ["a"])
            .with_table("t3", ["a"])
            .with_table("empty", Vec::<String>::new())
    }

    #[test]
    fn wildcard_and_computed_projection() {
        let sra = parse_query("SELECT *, x+y AS z FROM t;");
        let ra = desugar(&sra, &catalog()).unwrap();
        assert_eq!(
            ra.to_string(),
            "Pi([w, x, y, z], Rho(Add(x, y), z, Pi([w, x, y, Add(x, y)], Table(t))))"
        );
    }

    #[test]
    fn self_join_with_lifted_aliases() {
        let sra = parse_query(
            "SELECT f.a AS Col1, g.a AS Col2 FROM Foo f, Foo g WHERE Col1 != Col2;",
        );
        let ra = desugar(&sra, &catalog()).unwrap();
        assert_eq!(
            ra.to_string(),
            "Pi([Col1, Col2], Rho(g.a, Col2, Rho(f.a, Col1, Pi([f.a, g.a], \
             Sigma(Neq(Col1, Col2), Cross(RhoTable(f, Table(Foo)), RhoTable(g, Table(Foo))))))))"
        );
    }

    #[test]
    fn plain_projection_needs_one_pi() {
        let sra = parse_query("SELECT x, w FROM t;");
        let ra = desugar(&sra, &catalog()).unwrap();
        assert_eq!(ra.to_string(), "Pi([x, w], Table(t))");
    }

    #[test]
    fn natural_join_equivalence() {
        let sra = Sra::Join {
            kind: JoinKind::Natural,
            condition: JoinCondition::None,
            left: Box::new(Sra::table("T")),
            right: Box::new(Sra::table("U")),
        };
        let ra = desugar(&sra, &catalog()).unwrap();

        let expected = Ra::pi(
            vec![
                ColumnRef::new("a"),
                ColumnRef::new("b"),
                ColumnRef::new("c"),
            ],
            Ra::sigma(
                Expr::binary(
                    BinaryOp::Eq,
                    Expr::qualified("T", "a"),
                    Expr::qualified("U", "a"),
                ),
                Ra::cross(Ra::table("T"), Ra::table("U")),
            ),
        );
        assert_eq!(ra, expected);
    }

    #[test]
    fn using_restricts_the_merge() {
        let sra = parse_query("SELECT * FROM T JOIN U USING (a);");
        let ra = desugar(&sra, &catalog()).unwrap();
        assert_eq!(
            ra.to_string(),
            "Pi([a, b, c], Pi([a, b, c], Sigma(Eq(T.a, U.a), Cross(Table(T), Table(U)))))"
        );
    }

    #[test]
    fn qualified_wildcard_expands_qualified() {
        let sra = parse_query("SELECT f.* FROM Foo f, t;");
        let ra = desugar(&sra, &catalog()).unwrap();
        assert_eq!(
            ra.to_string(),
            "Pi([f.a], Cross(RhoTable(f, Table(Foo)), Table(t)))"
        );
    }

    #[test]
    fn outer_join_keeps_marked_construct() {
        let sra = parse_query("SELECT * FROM T LEFT OUTER JOIN t ON T.a = t.x;");
        let ra = desugar(&sra, &catalog()).unwrap();
        assert_eq!(
            ra.to_string(),
            "Pi([a, b, w, x, y], OuterJoin(left, Eq(T.a, t.x), Table(T), Table(t)))"
        );
    }

    #[test]
    fn outer_join_without_condition_is_an_error() {
        let sra = parse_query("SELECT * FROM T LEFT JOIN t;");
        assert_eq!(
            desugar(&sra, &catalog()),
            Err(DesugarError::MissingJoinCondition("LEFT OUTER"))
        );
    }

    #[test]
    fn set_op_transparency() {
        let sra = parse_query("SELECT a FROM t1 UNION SELECT a FROM t2 INTERSECT SELECT a FROM t3;");
        let ra = desugar(&sra, &catalog()).unwrap();
        assert_eq!(
            ra.to_string(),
            "Intersect(Union(Pi([a], Table(t1)), Pi([a], Table(t2))), Pi([a], Table(t3)))"
        );
    }

    #[test]
    fn order_by_becomes_a_decoration() {
        let sra = parse_query("SELECT x FROM t ORDER BY x DESC, w;");
        let ra = desugar(&sra, &catalog()).unwrap();
        assert_eq!(
            ra.to_string(),
            "OrderBy(x, desc, OrderBy(w, asc, Pi([x], Table(t))))"
        );
    }

    #[test]
    fn determinism_two_runs_structurally_equal() {
        let sra = parse_query("SELECT *, x+y, x*y FROM t WHERE w > 0;");
        let first = desugar(&sra, &catalog()).unwrap();
        let second = desugar(&sra, &catalog()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn synthesized_aliases_are_deterministic_and_fresh() {
        let sra = parse_query("SELECT x+y, x+y FROM t;");
        let ra = desugar(&sra, &catalog()).unwrap();
        assert_eq!(
            ra.to_string(),
            "Pi([add_x_y, add_x_y_2], Rho(Add(x, y), add_x_y_2, Rho(Add(x, y), add_x_y, \
             Pi([Add(x, y), Add(x, y)], Table(t)))))"
        );
    }

    #[test]
    fn synthesized_alias_avoids_scope_columns() {
        // `x` is taken by the schema, the synthesized name must not shadow
        // it.
        let catalog = StaticCatalog::new().with_table("s", ["neg_x", "x"]);
        let sra = parse_query("SELECT -x FROM s;");
        let ra = desugar(&sra, &catalog).unwrap();
        assert_eq!(
            ra.to_string(),
            "Pi([neg_x_2], Rho(Neg(x), neg_x_2, Pi([Neg(x)], Table(s))))"
        );
    }

    #[test]
    fn unknown_table_is_reported() {
        let sra = parse_query("SELECT * FROM nope;");
        assert_eq!(
            desugar(&sra, &catalog()),
            Err(DesugarError::UnknownTable("nope".into()))
        );
    }

    #[test]
    fn empty_expansion_is_reported() {
        let sra = parse_query("SELECT * FROM empty;");
        assert_eq!(
            desugar(&sra, &catalog()),
            Err(DesugarError::EmptyExpansion("*".into()))
        );
    }

    #[test]
    fn ambiguous_bare_wildcard_is_reported() {
        // Both operands contribute `a`.
        let sra = parse_query("SELECT * FROM t1, t2;");
        assert_eq!(
            desugar(&sra, &catalog()),
            Err(DesugarError::AmbiguousColumn("a".into()))
        );
    }

    #[test]
    fn duplicate_relation_is_reported() {
        let sra = parse_query("SELECT * FROM Foo, Foo;");
        assert_eq!(
            desugar(&sra, &catalog()),
            Err(DesugarError::DuplicateRelation("Foo".into()))
        );
    }

    #[test]
    fn group_by_is_cleanly_unsupported() {
        let sra = parse_query("SELECT a FROM t1 GROUP BY a;");
        assert_eq!(
            desugar(&sra, &catalog()),
            Err(DesugarError::Unsupported("GROUP BY"))
        );
    }

    #[test]
    fn limit_is_cleanly_unsupported() {
        let sra = parse_query("SELECT a FROM t1 LIMIT 5;");
        assert_eq!(
            desugar(&sra, &catalog()),
            Err(DesugarError::Unsupported("LIMIT"))
        );
    }

    #[test]
    fn using_with_unknown_column_is_reported() {
        let sra = parse_query("SELECT * FROM T JOIN U USING (b);");
        assert_eq!(
            desugar(&sra, &catalog()),
            Err(DesugarError::UnknownUsingColumn {
                column: "b".into(),
                side: "right",
            })
        );
    }

    #[test]
    fn in_subquery_is_desugared_recursively() {
        let sra = parse_query("SELECT x FROM t WHERE x IN (SELECT a FROM t1);");
        let ra = desugar(&sra, &catalog()).unwrap();
        assert_eq!(
            ra.to_string(),
            "Pi([x], Sigma(In(x, Pi([a], Table(t1))), Table(t)))"
        );
    }

    #[test]
    fn distinct_is_carried_on_the_outer_pi() {
        let sra = parse_query("SELECT DISTINCT x+y AS z FROM t;");
        let ra = desugar(&sra, &catalog()).unwrap();
        assert_eq!(
            ra.to_string(),
            "Pi(distinct, [z], Rho(Add(x, y), z, Pi([Add(x, y)], Table(t))))"
        );
    }
}
