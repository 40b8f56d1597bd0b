extern crate dot;

use std::io;
use std::io::Write;

use crate::ast::Expr;
use crate::symbols::Notation;

/// Graphviz export of a parsed formula, one graph node per AST node.
pub struct ParseTree {
    pub labels: Vec<String>,
    pub edges: Vec<GraphEdge>,
}

type GraphNode = usize;
type GraphEdge = (usize, String, usize);

impl ParseTree {
    pub fn new(root: &Expr, vars: &[String]) -> Self {
        let mut tree = Self {
            labels: Vec::new(),
            edges: Vec::new(),
        };
        tree.visit(root, vars);
        tree
    }

    pub fn render_dot<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        dot::render(self, writer)
    }

    /// Adds `node` and its subtrees in preorder, returning the id of `node`.
    fn visit(&mut self, node: &Expr, vars: &[String]) -> GraphNode {
        let symbols = Notation::Unicode.symbols();
        let id = self.labels.len();

        match node {
            Expr::False => self.labels.push(symbols.bot.to_string()),
            Expr::True => self.labels.push(symbols.top.to_string()),
            Expr::Var(i) => self.labels.push(vars[*i].clone()),
            Expr::Not(f) => {
                self.labels.push(symbols.not.to_string());
                let child = self.visit(f, vars);
                self.edges.push((id, String::new(), child));
            }
            Expr::BinaryOp(op, l, r) => {
                self.labels.push(op.symbol(Notation::Unicode).to_string());
                let left = self.visit(l, vars);
                self.edges.push((id, "L".to_string(), left));
                let right = self.visit(r, vars);
                self.edges.push((id, "R".to_string(), right));
            }
        }

        id
    }
}

impl<'a> dot::Labeller<'a, GraphNode, GraphEdge> for ParseTree {
    fn graph_id(&self) -> dot::Id<'a> {
        dot::Id::new("parse_tree").expect("cannot create Id named 'parse_tree'")
    }

    fn node_id(&self, n: &GraphNode) -> dot::Id<'a> {
        dot::Id::new(format!("n_{n}")).unwrap_or_else(|_| panic!("cannot create Id named 'n_{n}'"))
    }

    fn node_label(&self, n: &GraphNode) -> dot::LabelText<'a> {
        dot::LabelText::label(self.labels[*n].clone())
    }

    fn edge_label(&self, e: &GraphEdge) -> dot::LabelText<'a> {
        dot::LabelText::label(e.1.clone())
    }
}

impl<'a> dot::GraphWalk<'a, GraphNode, GraphEdge> for ParseTree {
    fn nodes(&self) -> dot::Nodes<'a, GraphNode> {
        (0..self.labels.len()).collect()
    }

    fn edges(&self) -> dot::Edges<'a, GraphEdge> {
        self.edges.clone().into()
    }

    fn source(&self, e: &GraphEdge) -> GraphNode {
        e.0
    }

    fn target(&self, e: &GraphEdge) -> GraphNode {
        e.2
    }
}
