//! Lowers the syntax tree into the owned IR, one statement at a time.
//!
//! Lowering is total for well-formed trees; trees damaged by parse errors
//! surface as [`LowerError`] values instead of panics, so one bad statement
//! never takes the rest of a batch down.

mod ddl;
mod expr;
mod query;

pub(crate) use expr::lower_expr;
pub(crate) use query::lower_query;

use rowan::ast::AstNode;

use crate::ast;
use crate::ir::Statement;
use crate::syntax::{SyntaxKind, SyntaxNode};

/// Errors produced while building IR from a syntax tree.
///
/// These are internal-invariant failures: either a construct the grammar
/// accepted but the IR rejects (nested aggregates, arity mismatches), or a
/// tree shape that can only come from an error recovery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    #[error("aggregate calls cannot be nested")]
    NestedAggregate,
    #[error("unknown function `{0}`; only aggregate functions are supported")]
    UnknownFunction(String),
    #[error("aggregate `{0}` takes exactly one argument")]
    AggregateArity(String),
    #[error("INSERT names {columns} target columns but supplies {values} values")]
    InsertArity { columns: usize, values: usize },
    #[error("malformed literal `{0}`")]
    MalformedLiteral(String),
    #[error("malformed syntax tree: {0}")]
    UnexpectedSyntax(&'static str),
}

/// Lowers every statement of a parsed input. Statements that failed to
/// parse (error-recovery residue) are skipped; their syntax diagnostics
/// were already reported by the parser.
pub fn lower_program(root: &ast::Root) -> Vec<Result<Statement, LowerError>> {
    root.statements()
        .filter(|node| node.kind() != SyntaxKind::Error)
        .map(|node| lower_statement(&node))
        .collect()
}

/// Lowers a single statement node.
pub fn lower_statement(node: &SyntaxNode) -> Result<Statement, LowerError> {
    match node.kind() {
        SyntaxKind::QueryStmt => {
            let query = ast::QueryStmt::cast(node.clone())
                .ok_or(LowerError::UnexpectedSyntax("expected a query statement"))?;
            Ok(Statement::Query(lower_query(&query)?))
        }
        SyntaxKind::CreateTableStmt => {
            let stmt = ast::CreateTableStmt::cast(node.clone())
                .ok_or(LowerError::UnexpectedSyntax("expected CREATE TABLE"))?;
            Ok(Statement::CreateTable(ddl::lower_create_table(&stmt)?))
        }
        SyntaxKind::InsertStmt => {
            let stmt = ast::InsertStmt::cast(node.clone())
                .ok_or(LowerError::UnexpectedSyntax("expected INSERT"))?;
            Ok(Statement::Insert(ddl::lower_insert(&stmt)?))
        }
        SyntaxKind::DeleteStmt => {
            let stmt = ast::DeleteStmt::cast(node.clone())
                .ok_or(LowerError::UnexpectedSyntax("expected DELETE"))?;
            Ok(Statement::Delete(ddl::lower_delete(&stmt)?))
        }
        _ => Err(LowerError::UnexpectedSyntax("not a statement node")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parse;

    fn lower_one(input: &str) -> Statement {
        let parsed = parse(input);
        assert!(parsed.ok(), "{:?}", parsed.errors);
        let root = ast::Root::cast(parsed.syntax()).unwrap();
        let mut statements = lower_program(&root);
        assert_eq!(statements.len(), 1);
        statements.remove(0).expect("statement should lower")
    }

    #[test]
    fn lower_select_with_projection_and_filter() {
        let stmt = lower_one("SELECT *, x+y AS z FROM t;");
        assert_eq!(
            stmt.to_string(),
            "Project([*, (Add(x, y), z)], Table(t))"
        );
    }

    #[test]
    fn lower_where_into_select_node() {
        let stmt = lower_one("SELECT a FROM t WHERE x > 3;");
        assert_eq!(stmt.to_string(), "Project([a], Select(Gt(x, 3), Table(t)))");
    }

    #[test]
    fn lower_comma_list_into_cross_join_chain() {
        let stmt = lower_one("SELECT * FROM a, b, c;");
        assert_eq!(
            stmt.to_string(),
            "Project([*], Join(cross, Join(cross, Table(a), Table(b)), Table(c)))"
        );
    }

    #[test]
    fn lower_join_chain_left_associative() {
        let stmt = lower_one("SELECT * FROM a JOIN b ON a.x = b.x JOIN c ON b.y = c.y;");
        assert_eq!(
            stmt.to_string(),
            "Project([*], Join(inner, Join(inner, Table(a), Table(b), Eq(a.x, b.x)), Table(c), Eq(b.y, c.y)))"
        );
    }

    #[test]
    fn lower_set_ops_left_associative() {
        let stmt =
            lower_one("SELECT a FROM t1 UNION SELECT a FROM t2 INTERSECT SELECT a FROM t3;");
        assert_eq!(
            stmt.to_string(),
            "Intersect(Union(Project([a], Table(t1)), Project([a], Table(t2))), Project([a], Table(t3)))"
        );
    }

    #[test]
    fn lower_order_by_outermost_primary() {
        let stmt = lower_one("SELECT a FROM t ORDER BY a DESC, b;");
        assert_eq!(
            stmt.to_string(),
            "OrderBy(a, desc, OrderBy(b, asc, Project([a], Table(t))))"
        );
    }

    #[test]
    fn lower_distinct_and_annotations() {
        let stmt = lower_one("SELECT DISTINCT a FROM t GROUP BY a HAVING count(a) > 1;");
        assert_eq!(
            stmt.to_string(),
            "Project(distinct, [a], groupby=[a], having=Gt(Count(a), 1), Table(t))"
        );
    }

    #[test]
    fn lower_limit_annotation() {
        let stmt = lower_one("SELECT a FROM t LIMIT 5;");
        assert_eq!(stmt.to_string(), "Project([a], limit=5, Table(t))");
    }

    #[test]
    fn lower_aliased_tables_and_columns() {
        let stmt = lower_one("SELECT f.a AS Col1, g.a AS Col2 FROM Foo f, Foo g WHERE Col1 != Col2;");
        assert_eq!(
            stmt.to_string(),
            "Project([(f.a, Col1), (g.a, Col2)], Select(Neq(Col1, Col2), Join(cross, Table(Foo, f), Table(Foo, g))))"
        );
    }

    #[test]
    fn lower_create_table() {
        let stmt = lower_one("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(64) NOT NULL);");
        assert_eq!(
            stmt.to_string(),
            "CreateTable(users, [Column(id, int, [PrimaryKey]), Column(name, varchar(64), [NotNull])])"
        );
    }

    #[test]
    fn lower_insert() {
        let stmt = lower_one("INSERT INTO t (a,b) VALUES (1,'hi');");
        assert_eq!(stmt.to_string(), "Insert(t, [a, b], [1, 'hi'])");
    }

    #[test]
    fn lower_delete() {
        let stmt = lower_one("DELETE FROM t WHERE x > 3;");
        assert_eq!(stmt.to_string(), "Delete(t, Gt(x, 3))");
    }

    #[test]
    fn insert_arity_mismatch_is_rejected() {
        let parsed = parse("INSERT INTO t (a,b) VALUES (1);");
        assert!(parsed.ok());
        let root = ast::Root::cast(parsed.syntax()).unwrap();
        let statements = lower_program(&root);
        assert_eq!(
            statements[0],
            Err(LowerError::InsertArity {
                columns: 2,
                values: 1
            })
        );
    }

    #[test]
    fn nested_aggregates_are_rejected() {
        let parsed = parse("SELECT sum(count(a)) FROM t;");
        assert!(parsed.ok());
        let root = ast::Root::cast(parsed.syntax()).unwrap();
        let statements = lower_program(&root);
        assert_eq!(statements[0], Err(LowerError::NestedAggregate));
    }

    #[test]
    fn unknown_function_is_rejected() {
        let parsed = parse("SELECT frobnicate(a) FROM t;");
        assert!(parsed.ok());
        let root = ast::Root::cast(parsed.syntax()).unwrap();
        let statements = lower_program(&root);
        assert_eq!(
            statements[0],
            Err(LowerError::UnknownFunction("frobnicate".into()))
        );
    }

    #[test]
    fn in_subquery_lowering() {
        let stmt = lower_one("SELECT a FROM t WHERE a IN (SELECT b FROM u);");
        assert_eq!(
            stmt.to_string(),
            "Project([a], Select(In(a, Project([b], Table(u))), Table(t)))"
        );
    }

    #[test]
    fn broken_statements_are_skipped_but_good_ones_lower() {
        let parsed = parse("SELECT FROM; DELETE FROM t;");
        assert!(!parsed.ok());
        let root = ast::Root::cast(parsed.syntax()).unwrap();
        let statements = lower_program(&root);
        // The damaged query either lowers to an error or is skipped; the
        // delete must survive.
        assert!(statements
            .iter()
            .any(|s| matches!(s, Ok(Statement::Delete(_)))));
    }
}
