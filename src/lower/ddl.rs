//! Lowering of CREATE TABLE, INSERT and DELETE statements.

use crate::ast;
use crate::ir::{
    ColumnConstraint, ColumnDef, CreateTable, Datatype, Delete, Insert, Literal, TableKey,
};
use crate::lower::{lower_expr, LowerError};
use crate::syntax::SyntaxKind;

pub(crate) fn lower_create_table(stmt: &ast::CreateTableStmt) -> Result<CreateTable, LowerError> {
    let name = stmt
        .table_name()
        .ok_or(LowerError::UnexpectedSyntax("CREATE TABLE without a name"))?;

    let columns = stmt
        .column_defs()
        .iter()
        .map(lower_column_def)
        .collect::<Result<Vec<_>, _>>()?;
    let keys = stmt
        .table_keys()
        .iter()
        .map(lower_table_key)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CreateTable {
        name,
        columns,
        keys,
    })
}

fn lower_column_def(def: &ast::ColumnDef) -> Result<ColumnDef, LowerError> {
    let name = def
        .name()
        .ok_or(LowerError::UnexpectedSyntax("column without a name"))?;

    let datatype = def
        .datatype()
        .ok_or(LowerError::UnexpectedSyntax("column without a datatype"))?;
    let datatype = Datatype {
        // Type names compare case-insensitively; normalize once here.
        name: datatype
            .name()
            .ok_or(LowerError::UnexpectedSyntax("datatype without a name"))?
            .to_lowercase(),
        size: datatype.size(),
    };

    let constraints = def
        .constraints()
        .map(|constraint| lower_constraint(&constraint))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ColumnDef {
        name,
        datatype,
        constraints,
    })
}

fn lower_constraint(
    constraint: &ast::ColumnConstraint,
) -> Result<ColumnConstraint, LowerError> {
    let keywords = constraint.keywords();

    match keywords.first().map(String::as_str) {
        Some("not") => Ok(ColumnConstraint::NotNull),
        Some("unique") => Ok(ColumnConstraint::Unique),
        Some("primary") => Ok(ColumnConstraint::PrimaryKey),
        Some("foreign") | Some("references") => {
            let idents = constraint.idents();
            let table = idents
                .first()
                .cloned()
                .ok_or(LowerError::UnexpectedSyntax("reference without a target table"))?;
            Ok(ColumnConstraint::ForeignKey {
                table,
                column: idents.get(1).cloned(),
            })
        }
        Some("default") => {
            let value = constraint
                .value()
                .ok_or(LowerError::UnexpectedSyntax("DEFAULT without a literal"))?;
            Ok(ColumnConstraint::Default(lower_value(&value)?))
        }
        Some("auto") => Ok(ColumnConstraint::AutoIncrement),
        Some("check") => {
            let element = constraint
                .check_expression()
                .ok_or(LowerError::UnexpectedSyntax("CHECK without an expression"))?;
            Ok(ColumnConstraint::Check(lower_expr(&element)?))
        }
        _ => Err(LowerError::UnexpectedSyntax("unknown column constraint")),
    }
}

fn lower_table_key(key: &ast::TableKey) -> Result<TableKey, LowerError> {
    let keywords = key.keywords();
    let idents = key.idents_with_reference_flag();

    match keywords.first().map(String::as_str) {
        Some("primary") => Ok(TableKey::Primary(
            idents.into_iter().map(|(name, _)| name).collect(),
        )),
        Some("unique") => Ok(TableKey::Unique(
            idents.into_iter().map(|(name, _)| name).collect(),
        )),
        Some("foreign") => {
            let columns: Vec<String> = idents
                .iter()
                .filter(|(_, referenced)| !referenced)
                .map(|(name, _)| name.clone())
                .collect();
            let mut referenced = idents
                .into_iter()
                .filter(|(_, referenced)| *referenced)
                .map(|(name, _)| name);
            let table = referenced
                .next()
                .ok_or(LowerError::UnexpectedSyntax("FOREIGN KEY without a target"))?;

            Ok(TableKey::Foreign {
                columns,
                table,
                references: referenced.collect(),
            })
        }
        _ => Err(LowerError::UnexpectedSyntax("unknown key declaration")),
    }
}

pub(crate) fn lower_insert(stmt: &ast::InsertStmt) -> Result<Insert, LowerError> {
    let table = stmt
        .table_name()
        .ok_or(LowerError::UnexpectedSyntax("INSERT without a table"))?;
    let columns = stmt.column_names();
    let values = stmt
        .values()
        .iter()
        .map(lower_value)
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(columns) = &columns {
        if columns.len() != values.len() {
            return Err(LowerError::InsertArity {
                columns: columns.len(),
                values: values.len(),
            });
        }
    }

    Ok(Insert {
        table,
        columns,
        values,
    })
}

pub(crate) fn lower_delete(stmt: &ast::DeleteStmt) -> Result<Delete, LowerError> {
    let table = stmt
        .table_name()
        .ok_or(LowerError::UnexpectedSyntax("DELETE without a table"))?;

    let predicate = match stmt.where_clause() {
        Some(clause) => {
            let element = clause
                .expression()
                .ok_or(LowerError::UnexpectedSyntax("WHERE without an expression"))?;
            Some(lower_expr(&element)?)
        }
        None => None,
    };

    Ok(Delete { table, predicate })
}

fn lower_value(value: &ast::Value) -> Result<Literal, LowerError> {
    let token = value
        .literal_token()
        .ok_or(LowerError::UnexpectedSyntax("value without a literal"))?;

    let literal = match token.kind() {
        SyntaxKind::Integer => Literal::Int(
            token
                .text()
                .parse()
                .map_err(|_| LowerError::MalformedLiteral(token.text().to_string()))?,
        ),
        SyntaxKind::Double => Literal::Double(
            token
                .text()
                .parse()
                .map_err(|_| LowerError::MalformedLiteral(token.text().to_string()))?,
        ),
        SyntaxKind::QuotedLiteral => {
            let text = token.text();
            Literal::Str(text[1..text.len() - 1].to_string())
        }
        SyntaxKind::Keyword if token.text().eq_ignore_ascii_case("null") => Literal::Null,
        _ => return Err(LowerError::MalformedLiteral(token.text().to_string())),
    };

    if !value.is_negated() {
        return Ok(literal);
    }
    match literal {
        Literal::Int(v) => Ok(Literal::Int(-v)),
        Literal::Double(v) => Ok(Literal::Double(-v)),
        _ => Err(LowerError::MalformedLiteral(
            "only numeric literals can be negated".into(),
        )),
    }
}
