#![allow(dead_code)]

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use connectors::sql::base::{
    adapter::{RowStream, SqlAdapter},
    error::DbError,
};
use model::{
    core::{normalize::normalize_value, value::Value},
    metadata::{column::Column, table::Table},
    records::row::RowData,
};
use planner::query::{
    ast::{
        expr::{BinaryOperator, Expr},
        select::Select,
    },
    dialect::{Dialect, MySql},
    renderer::render,
};
use std::{cmp::Ordering, collections::HashMap, collections::VecDeque};

pub const CATALOG_SQL: &str = "SELECT catalog";

/// A connection over tables held in memory. Chunk queries are answered by
/// evaluating the `Select` tree, so the rendered SQL is never parsed.
#[derive(Default)]
pub struct MemoryAdapter {
    dialect: MySql,
    tables: HashMap<(String, String), Vec<RowData>>,
    catalog: Vec<RowData>,
    /// Number of catalog rows served before the catalog stream fails.
    catalog_fails_after: Option<usize>,
    catalog_calls: usize,
    pub selects: Vec<Select>,
    pub statements: Vec<String>,
    pub closed_streams: usize,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        MemoryAdapter::default()
    }

    pub fn with_table(mut self, table: &Table, rows: Vec<RowData>) -> Self {
        for column in &table.columns {
            self.catalog.push(catalog_row(column));
        }
        self.tables
            .insert((table.schema.clone(), table.name.clone()), rows);
        self
    }

    pub fn with_catalog_failure_after(mut self, rows: usize) -> Self {
        self.catalog_fails_after = Some(rows);
        self
    }

    fn catalog_stream(&mut self) -> VecDeque<Result<RowData, DbError>> {
        // Serve the catalog in a different order on every call.
        let mut rows = self.catalog.clone();
        if !rows.is_empty() {
            let shift = (self.catalog_calls * 3) % rows.len();
            rows.rotate_left(shift);
            if self.catalog_calls % 2 == 1 {
                rows.reverse();
            }
        }
        self.catalog_calls += 1;

        let mut out: VecDeque<Result<RowData, DbError>> = rows.into_iter().map(Ok).collect();
        if let Some(limit) = self.catalog_fails_after {
            out.truncate(limit);
            out.push_back(Err(DbError::Decode("catalog stream broke".into())));
        }
        out
    }

    fn evaluate(&self, select: &Select) -> Result<VecDeque<Result<RowData, DbError>>, DbError> {
        let from = select
            .from
            .as_ref()
            .ok_or_else(|| DbError::Decode("missing FROM".into()))?;
        let key = (
            from.table.schema.clone().unwrap_or_default(),
            from.table.name.clone(),
        );
        let rows = self
            .tables
            .get(&key)
            .ok_or_else(|| DbError::Decode(format!("unknown table {}.{}", key.0, key.1)))?;

        let mut matched: Vec<&RowData> = rows
            .iter()
            .filter(|row| {
                select
                    .where_clause
                    .as_ref()
                    .is_none_or(|expr| truthy(&eval(expr, row)))
            })
            .collect();

        matched.sort_by(|a, b| {
            for term in &select.order_by {
                let ord = eval(&term.expr, a)
                    .compare(&eval(&term.expr, b))
                    .unwrap_or(Ordering::Equal);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        let limit = match &select.limit {
            Some(Expr::Value(v)) => v.as_u64().map(|n| n as usize).unwrap_or(usize::MAX),
            _ => usize::MAX,
        };

        Ok(matched
            .into_iter()
            .take(limit)
            .map(|row| Ok(project(select, row)))
            .collect())
    }
}

#[async_trait]
impl SqlAdapter for MemoryAdapter {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn catalog_sql(&self) -> &'static str {
        CATALOG_SQL
    }

    async fn query_stream<'a>(
        &'a mut self,
        sql: &str,
        _params: Vec<Value>,
    ) -> Result<Box<dyn RowStream + 'a>, DbError> {
        self.statements.push(sql.to_string());
        if sql != CATALOG_SQL {
            return Err(DbError::Decode(format!("unsupported statement: {sql}")));
        }
        let rows = self.catalog_stream();
        Ok(Box::new(MemoryRowStream {
            rows,
            closed: &mut self.closed_streams,
        }))
    }

    async fn select_stream<'a>(
        &'a mut self,
        select: &Select,
    ) -> Result<Box<dyn RowStream + 'a>, DbError> {
        let (sql, _) = render(select, &self.dialect);
        self.statements.push(sql);
        self.selects.push(select.clone());

        let rows = self.evaluate(select)?;
        Ok(Box::new(MemoryRowStream {
            rows,
            closed: &mut self.closed_streams,
        }))
    }

    async fn disconnect(self) -> Result<(), DbError> {
        Ok(())
    }
}

pub struct MemoryRowStream<'a> {
    rows: VecDeque<Result<RowData, DbError>>,
    closed: &'a mut usize,
}

#[async_trait]
impl RowStream for MemoryRowStream<'_> {
    async fn next_row(&mut self) -> Result<Option<RowData>, DbError> {
        self.rows.pop_front().transpose()
    }

    async fn close(&mut self) -> Result<(), DbError> {
        self.rows.clear();
        *self.closed += 1;
        Ok(())
    }
}

fn eval(expr: &Expr, row: &RowData) -> Value {
    match expr {
        Expr::Identifier(ident) => normalize_value(row.get_value(&ident.name)),
        Expr::Value(v) => v.clone(),
        Expr::Bool(b) => Value::Boolean(*b),
        Expr::BinaryOp(op) => {
            let left = eval(&op.left, row);
            let right = eval(&op.right, row);
            let ord = left.compare(&right);
            let result = match op.op {
                BinaryOperator::And => truthy(&left) && truthy(&right),
                BinaryOperator::Or => truthy(&left) || truthy(&right),
                BinaryOperator::Eq => ord == Some(Ordering::Equal),
                BinaryOperator::NotEq => matches!(ord, Some(o) if o != Ordering::Equal),
                BinaryOperator::Lt => ord == Some(Ordering::Less),
                BinaryOperator::LtEq => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
                BinaryOperator::Gt => ord == Some(Ordering::Greater),
                BinaryOperator::GtEq => {
                    matches!(ord, Some(Ordering::Greater | Ordering::Equal))
                }
            };
            Value::Boolean(result)
        }
    }
}

fn truthy(value: &Value) -> bool {
    matches!(value, Value::Boolean(true))
}

fn project(select: &Select, row: &RowData) -> RowData {
    let mut out = RowData::new(&row.entity);
    for column in &select.columns {
        if let Expr::Identifier(ident) = column {
            out.set(ident.name.clone(), row.get_value(&ident.name));
        }
    }
    out
}

fn catalog_row(column: &Column) -> RowData {
    // Text arrives as raw bytes, the way the MySQL driver hands it over.
    RowData::from_pairs(
        "COLUMNS",
        [
            ("TABLE_SCHEMA", Value::Bytes(column.schema.clone().into_bytes())),
            ("TABLE_NAME", Value::Bytes(column.table.clone().into_bytes())),
            ("COLUMN_NAME", Value::Bytes(column.name.clone().into_bytes())),
            ("ORDINAL_POSITION", Value::Uint(column.ordinal as u64)),
            ("is_primary_key", Value::Int(column.is_primary_key as i64)),
            (
                "key_position",
                column
                    .key_position
                    .map(|p| Value::Uint(p as u64))
                    .unwrap_or(Value::Null),
            ),
        ],
    )
}

/// `shop.orders (region, id, note)` keyed by `(region, id)`.
pub fn orders_table() -> Table {
    let mut table = Table::new("shop", "orders");
    table.add_column(Column::new("shop", "orders", "region", 1, true));
    table.add_column(Column::new("shop", "orders", "id", 2, true));
    table.add_column(Column::new("shop", "orders", "note", 3, false));
    table
}

/// `shop.pairs (a, b, c)` with `PRIMARY KEY (b, a)`.
pub fn pairs_table() -> Table {
    let mut table = Table::new("shop", "pairs");
    table.add_column(Column::new("shop", "pairs", "a", 1, true).with_key_position(2));
    table.add_column(Column::new("shop", "pairs", "b", 2, true).with_key_position(1));
    table.add_column(Column::new("shop", "pairs", "c", 3, false));
    table
}

/// `n` rows for [`pairs_table`].
pub fn pair_rows(n: usize) -> Vec<RowData> {
    (0..n)
        .map(|i| {
            RowData::from_pairs(
                "pairs",
                [
                    ("a", Value::Int((i % 4) as i64)),
                    ("b", Value::Int((i / 4) as i64)),
                    ("c", Value::Bytes(format!("row {i}").into_bytes())),
                ],
            )
        })
        .collect()
}

/// `shop.ledger (id DECIMAL(20,0), amount)` keyed by `id`.
pub fn ledger_table() -> Table {
    let mut table = Table::new("shop", "ledger");
    table.add_column(Column::new("shop", "ledger", "id", 1, true));
    table.add_column(Column::new("shop", "ledger", "amount", 2, false));
    table
}

/// `n` ledger rows whose ids start at 2^53, where neighbours collapse
/// into the same double.
pub fn ledger_rows(n: usize) -> Vec<RowData> {
    let base: BigDecimal = "9007199254740992".parse().unwrap_or_default();
    (0..n)
        .rev()
        .map(|i| {
            RowData::from_pairs(
                "ledger",
                [
                    ("id", Value::Decimal(&base + BigDecimal::from(i as u64))),
                    ("amount", Value::Int(i as i64)),
                ],
            )
        })
        .collect()
}

/// `shop.audit_log (message)` with no primary key.
pub fn audit_log_table() -> Table {
    let mut table = Table::new("shop", "audit_log");
    table.add_column(Column::new("shop", "audit_log", "message", 1, false));
    table
}

/// `n` order rows spread over three regions, stored in no particular order.
pub fn order_rows(n: usize) -> Vec<RowData> {
    let regions = ["us", "eu", "ap"];
    (0..n)
        .rev()
        .map(|i| {
            RowData::from_pairs(
                "orders",
                [
                    ("region", Value::Bytes(regions[i % 3].as_bytes().to_vec())),
                    ("id", Value::Int((i / 3) as i64 + 1)),
                    ("note", Value::Bytes(format!("order {i}").into_bytes())),
                ],
            )
        })
        .collect()
}

/// Primary-key tuple of a normalized row.
pub fn key_of(row: &RowData) -> (String, i64) {
    let region = row.get_value("region").as_string().unwrap_or_default();
    let id = match row.get_value("id") {
        Value::Int(i) => i,
        other => panic!("unexpected id value {other:?}"),
    };
    (region, id)
}
