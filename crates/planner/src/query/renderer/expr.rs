use crate::query::{
    ast::expr::{BinaryOp, BinaryOperator, Expr, Ident},
    renderer::{Render, Renderer},
};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Identifier(ident) => ident.render(r),
            Expr::Value(val) => r.add_param(val.clone()),
            Expr::Bool(true) => r.sql.push_str("TRUE"),
            Expr::Bool(false) => r.sql.push_str("FALSE"),
            Expr::BinaryOp(op) => op.render(r),
        }
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        if let Some(qualifier) = &self.qualifier {
            r.sql.push_str(&r.dialect.quote_identifier(qualifier));
            r.sql.push('.');
        }
        r.sql.push_str(&r.dialect.quote_identifier(&self.name));
    }
}

impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        render_operand(&self.left, self.op, r);

        let op_str = match self.op {
            BinaryOperator::Eq => " = ",
            BinaryOperator::NotEq => " <> ",
            BinaryOperator::Lt => " < ",
            BinaryOperator::LtEq => " <= ",
            BinaryOperator::Gt => " > ",
            BinaryOperator::GtEq => " >= ",
            BinaryOperator::And => " AND ",
            BinaryOperator::Or => " OR ",
        };
        r.sql.push_str(op_str);

        render_operand(&self.right, self.op, r);
    }
}

/// Parenthesizes an operand only when SQL precedence would otherwise
/// regroup it. AND and OR are associative, so equal precedence needs no
/// parentheses; nested comparisons always get them.
fn render_operand(operand: &Expr, parent: BinaryOperator, r: &mut Renderer) {
    let needs_parens = match operand {
        Expr::BinaryOp(child) => {
            let (child_prec, parent_prec) = (child.op.precedence(), parent.precedence());
            child_prec < parent_prec || (child_prec == parent_prec && parent.is_comparison())
        }
        _ => false,
    };

    if needs_parens {
        r.sql.push('(');
        operand.render(r);
        r.sql.push(')');
    } else {
        operand.render(r);
    }
}
