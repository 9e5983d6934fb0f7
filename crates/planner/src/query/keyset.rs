//! Keyset pagination over an N-column primary key.
//!
//! SQL has no portable row-value comparison, so `(p0, .., pk) > (c0, .., ck)`
//! is expanded into a disjunction of conjunctions, one per key column:
//!
//! ```text
//! p0 > c0
//! OR p0 = c0 AND p1 > c1
//! OR p0 = c0 AND p1 = c1 AND p2 > c2
//! ...
//! ```
//!
//! Ordering by the same columns, in the same order, makes every chunk start
//! strictly after the last row of the previous one.

use crate::{
    error::PlanError,
    query::{
        ast::{
            expr::{BinaryOperator, Expr},
            select::OrderByExpr,
        },
        builder::select::{FromState, SelectBuilder},
        ident, value,
    },
};
use model::{
    core::value::Value,
    metadata::table::Table,
    pagination::cursor::{Cursor, CursorError},
    records::row::RowData,
};
use tracing::trace;

/// The pieces a chunk query needs from the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetPlan {
    /// `TRUE` for the first chunk, the lexicographic "greater than cursor"
    /// comparison afterwards.
    pub predicate: Expr,
    /// Values bound by `predicate`, in the order its placeholders appear.
    pub binds: Vec<Value>,
    /// Primary-key columns, ascending.
    pub order_by: Vec<OrderByExpr>,
}

#[derive(Debug, Clone)]
pub struct KeysetPlanner {
    table: String,
    primary_keys: Vec<String>,
}

impl KeysetPlanner {
    /// Fails with [`PlanError::MissingPrimaryKey`] for tables without a
    /// primary key: they have no total order to resume from.
    pub fn new(table: &Table) -> Result<Self, PlanError> {
        Self::from_keys(&table.to_string(), table.primary_keys())
    }

    pub fn from_keys(table: &str, primary_keys: Vec<String>) -> Result<Self, PlanError> {
        if primary_keys.is_empty() {
            return Err(PlanError::MissingPrimaryKey {
                table: table.to_string(),
            });
        }
        Ok(KeysetPlanner {
            table: table.to_string(),
            primary_keys,
        })
    }

    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    pub fn plan(&self, cursor: &Cursor) -> Result<KeysetPlan, PlanError> {
        let order_by = self
            .primary_keys
            .iter()
            .map(|pk| OrderByExpr {
                expr: ident(pk),
                direction: None,
            })
            .collect();

        if cursor.is_start() {
            return Ok(KeysetPlan {
                predicate: Expr::Bool(true),
                binds: Vec::new(),
                order_by,
            });
        }

        if cursor.len() != self.primary_keys.len() {
            return Err(PlanError::CursorArity {
                table: self.table.clone(),
                expected: self.primary_keys.len(),
                actual: cursor.len(),
            });
        }

        let values = cursor.values();
        let mut binds = Vec::with_capacity(self.primary_keys.len() * (self.primary_keys.len() + 1) / 2);
        let mut predicate: Option<Expr> = None;

        for i in 0..self.primary_keys.len() {
            let mut conjunction: Option<Expr> = None;

            for j in 0..i {
                let eq = compare(&self.primary_keys[j], BinaryOperator::Eq, &values[j]);
                binds.push(values[j].clone());
                conjunction = Some(match conjunction {
                    Some(acc) => Expr::and(acc, eq),
                    None => eq,
                });
            }

            let gt = compare(&self.primary_keys[i], BinaryOperator::Gt, &values[i]);
            binds.push(values[i].clone());
            let conjunction = match conjunction {
                Some(acc) => Expr::and(acc, gt),
                None => gt,
            };

            predicate = Some(match predicate {
                Some(acc) => Expr::or(acc, conjunction),
                None => conjunction,
            });
        }

        trace!(table = %self.table, binds = binds.len(), "Planned keyset predicate");

        Ok(KeysetPlan {
            // The key is non-empty, so at least one disjunct was built.
            predicate: predicate.unwrap_or(Expr::Bool(true)),
            binds,
            order_by,
        })
    }

    /// Applies the pagination logic (WHERE, ORDER BY and LIMIT) to a
    /// SelectBuilder.
    pub fn apply_to_builder(
        &self,
        builder: SelectBuilder<FromState>,
        cursor: &Cursor,
        limit: usize,
    ) -> Result<SelectBuilder<FromState>, PlanError> {
        let plan = self.plan(cursor)?;

        let mut builder = builder.and_where(plan.predicate);
        for order in plan.order_by {
            builder = builder.order_by(order.expr, order.direction);
        }

        Ok(builder.limit(value(Value::Uint(limit as u64))))
    }

    /// Generates the next cursor from the last fetched row.
    pub fn next_cursor(&self, row: &RowData) -> Result<Cursor, CursorError> {
        Cursor::from_row(self.primary_keys.as_slice(), row)
    }
}

fn compare(column: &str, op: BinaryOperator, val: &Value) -> Expr {
    Expr::binary(ident(column), op, value(val.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::{builder::select::SelectBuilder, dialect::MySql, renderer::render},
        table_ref,
    };
    use model::metadata::column::Column;

    fn orders() -> Table {
        let mut table = Table::new("shop", "orders");
        table.add_column(Column::new("shop", "orders", "region", 1, true));
        table.add_column(Column::new("shop", "orders", "id", 2, true));
        table.add_column(Column::new("shop", "orders", "total", 3, false));
        table
    }

    fn render_order(plan: &KeysetPlan) -> Vec<String> {
        plan.order_by
            .iter()
            .map(|o| render(&o.expr, &MySql).0)
            .collect()
    }

    #[test]
    fn test_compound_key_predicate() {
        let planner = KeysetPlanner::new(&orders()).unwrap();
        let cursor = Cursor::new(vec![Value::String("us".into()), Value::Int(5)]);

        let plan = planner.plan(&cursor).unwrap();
        let (sql, params) = render(&plan.predicate, &MySql);

        assert_eq!(sql, "`region` > ? OR `region` = ? AND `id` > ?");
        assert_eq!(
            plan.binds,
            vec![
                Value::String("us".into()),
                Value::String("us".into()),
                Value::Int(5)
            ]
        );
        assert_eq!(params, plan.binds);
        assert_eq!(render_order(&plan), vec!["`region`", "`id`"]);
    }

    #[test]
    fn test_three_column_key() {
        let planner =
            KeysetPlanner::from_keys("t", vec!["a".into(), "b".into(), "c".into()]).unwrap();
        let cursor = Cursor::new(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

        let plan = planner.plan(&cursor).unwrap();
        let (sql, _) = render(&plan.predicate, &MySql);

        assert_eq!(
            sql,
            "`a` > ? OR `a` = ? AND `b` > ? OR `a` = ? AND `b` = ? AND `c` > ?"
        );
        assert_eq!(
            plan.binds,
            [1, 1, 2, 1, 2, 3].map(Value::Int).to_vec()
        );
    }

    #[test]
    fn test_single_column_key() {
        let planner = KeysetPlanner::from_keys("t", vec!["id".into()]).unwrap();
        let plan = planner.plan(&Cursor::new(vec![Value::Uint(9)])).unwrap();
        let (sql, params) = render(&plan.predicate, &MySql);

        assert_eq!(sql, "`id` > ?");
        assert_eq!(params, vec![Value::Uint(9)]);
    }

    #[test]
    fn test_empty_cursor_is_tautology() {
        let planner = KeysetPlanner::new(&orders()).unwrap();
        let plan = planner.plan(&Cursor::start()).unwrap();

        assert_eq!(plan.predicate, Expr::Bool(true));
        assert!(plan.binds.is_empty());
        assert_eq!(render_order(&plan), vec!["`region`", "`id`"]);
    }

    #[test]
    fn test_cursor_arity_mismatch_fails() {
        let planner = KeysetPlanner::new(&orders()).unwrap();

        let short = Cursor::new(vec![Value::String("us".into())]);
        assert_eq!(
            planner.plan(&short).unwrap_err(),
            PlanError::CursorArity {
                table: "shop.orders".into(),
                expected: 2,
                actual: 1,
            }
        );

        let long = Cursor::new(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(matches!(
            planner.plan(&long),
            Err(PlanError::CursorArity { actual: 3, .. })
        ));
    }

    #[test]
    fn test_table_without_primary_key_is_rejected() {
        let mut table = Table::new("shop", "audit");
        table.add_column(Column::new("shop", "audit", "msg", 1, false));

        assert_eq!(
            KeysetPlanner::new(&table).unwrap_err(),
            PlanError::MissingPrimaryKey {
                table: "shop.audit".into()
            }
        );
    }

    #[test]
    fn test_apply_to_builder_renders_full_query() {
        let table = orders();
        let planner = KeysetPlanner::new(&table).unwrap();
        let columns = table.column_names().iter().map(|c| ident(c)).collect();
        let builder = SelectBuilder::new()
            .select(columns)
            .from(table_ref!(table.schema, table.name), None);

        let cursor = Cursor::new(vec![Value::String("eu".into()), Value::Int(7)]);
        let select = planner
            .apply_to_builder(builder, &cursor, 1_000)
            .unwrap()
            .build();
        let (sql, params) = render(&select, &MySql);

        assert_eq!(
            sql,
            "SELECT `region`, `id`, `total` FROM `shop`.`orders` \
             WHERE `region` > ? OR `region` = ? AND `id` > ? \
             ORDER BY `region`, `id` LIMIT ?"
        );
        assert_eq!(params.len(), 4);
        assert_eq!(params[3], Value::Uint(1_000));
    }

    #[test]
    fn test_next_cursor_reads_key_columns() {
        let planner = KeysetPlanner::new(&orders()).unwrap();
        let row = RowData::from_pairs(
            "orders",
            [
                ("region", Value::String("us".into())),
                ("id", Value::Int(12)),
                ("total", Value::Float(3.5)),
            ],
        );
        assert_eq!(
            planner.next_cursor(&row).unwrap(),
            Cursor::new(vec![Value::String("us".into()), Value::Int(12)])
        );
    }
}
