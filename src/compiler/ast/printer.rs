/*!
Debug dumps of a syntax tree.  Both printers are read only walks of a
[`Program`]: one writes an indented text outline, the other writes a
Graphviz `digraph` that can be rendered with `dot`.
 */
use std::io::{Result, Write};

use super::{Expression, LValue, Procedure, Program, Statement, VarDecl};

/// A labelled view of a single node and its children.
struct View {
    label: String,
    children: Vec<View>,
}

impl View {
    fn leaf(label: String) -> View {
        View {
            label,
            children: vec![],
        }
    }

    fn node(label: String, children: Vec<View>) -> View {
        View { label, children }
    }
}

fn program_view(p: &Program) -> View {
    let mut children: Vec<View> = p.globals.iter().map(var_decl_view).collect();
    children.extend(p.procedures.iter().map(procedure_view));
    View::node("program".into(), children)
}

fn var_decl_view(v: &VarDecl) -> View {
    View::leaf(format!("L{}: var {} {}", v.line, v.shape, v.name))
}

fn procedure_view(p: &Procedure) -> View {
    let mut children: Vec<View> = p
        .params
        .iter()
        .map(|a| View::leaf(format!("L{}: arg {}", a.line, a.name)))
        .collect();
    children.push(statement_view(&p.body));
    View::node(format!("L{}: procedure {}", p.line, p.name), children)
}

fn lvalue_children(lv: &LValue) -> Vec<View> {
    match lv {
        LValue::Variable(_) => vec![],
        LValue::Element(_, idx) => vec![expression_view(idx)],
    }
}

fn statement_view(s: &Statement) -> View {
    let label = format!("L{}: {}", s.line(), s.root_str());
    let children = match s {
        Statement::Declare(..) => vec![],
        Statement::Assign(_, lv, e) => {
            let mut c = lvalue_children(lv);
            c.push(expression_view(e));
            c
        }
        Statement::Block(_, body) => body.iter().map(statement_view).collect(),
        Statement::If {
            cond,
            if_arm,
            else_arm,
            ..
        } => {
            let mut c = vec![expression_view(cond), statement_view(if_arm)];
            if let Some(e) = else_arm {
                c.push(statement_view(e));
            }
            c
        }
        Statement::While { cond, body, .. } => vec![expression_view(cond), statement_view(body)],
        Statement::Output(_, e) | Statement::Return(_, e) => vec![expression_view(e)],
        Statement::Input(_, lv) => lvalue_children(lv),
        Statement::Call(_, _, args) => args.iter().map(expression_view).collect(),
    };
    View::node(label, children)
}

fn expression_view(e: &Expression) -> View {
    let label = format!("L{}: {}", e.line(), e.root_str());
    let children = match e {
        Expression::Integer(..) | Expression::Boolean(..) | Expression::Identifier(..) => vec![],
        Expression::ArrayAt(_, _, idx) => vec![expression_view(idx)],
        Expression::RoutineCall(_, _, args) => args.iter().map(expression_view).collect(),
        Expression::BinaryOp(_, _, l, r) => vec![expression_view(l), expression_view(r)],
        Expression::UnaryOp(_, _, operand) => vec![expression_view(operand)],
    };
    View::node(label, children)
}

/// Writes an indented outline of the tree, one node per line.
pub fn print_tree(program: &Program, output: &mut dyn Write) -> Result<()> {
    fn walk(v: &View, depth: usize, output: &mut dyn Write) -> Result<()> {
        writeln!(output, "{}{}", " ".repeat(depth * 2), v.label)?;
        for c in &v.children {
            walk(c, depth + 1, output)?;
        }
        Ok(())
    }

    walk(&program_view(program), 0, output)
}

/// Writes the tree as a Graphviz `digraph`.  Nodes are numbered in pre-order
/// starting at 1.
pub fn print_graphviz(program: &Program, output: &mut dyn Write) -> Result<()> {
    fn walk(v: &View, next_id: &mut usize, output: &mut dyn Write) -> Result<usize> {
        let id = *next_id;
        *next_id += 1;
        writeln!(output, "n{} [label=\"{}\"];", id, v.label.replace('"', "\\\""))?;
        for c in &v.children {
            let cid = walk(c, next_id, output)?;
            writeln!(output, "n{} -> n{};", id, cid)?;
        }
        Ok(id)
    }

    writeln!(output, "digraph parse_tree {{")?;
    writeln!(output, "node [color=lightblue2, style=filled];")?;
    let mut next_id = 1;
    walk(&program_view(program), &mut next_id, output)?;
    writeln!(output, "}}")
}
