//! Binary expression tree and its incremental assembler
//!
//! The parser builds the tree in a single pass. Leaves hold an
//! [`Expression`]; inner nodes hold a [`BoolOperator`] and up to two
//! children. A node whose `right` is empty acts as a passthrough wrapper
//! around `left`; consumers walk it as if it were `left` itself.
//!
//! Folding is three-way and identical for leaves and closed groups: fill
//! `left` if empty, else fill `right`, else lift the current node into the
//! left child of a new parent.

use crate::expression::{BoolOperator, Expression};
use serde::Serialize;

/// One node of the expression tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bool_operator: Option<BoolOperator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<Node>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<Node>>,
}

impl Node {
    /// An inner node with no children yet, seeded with the operator that
    /// will connect its future children.
    pub fn empty(bool_operator: Option<BoolOperator>) -> Self {
        Self {
            bool_operator,
            expression: None,
            left: None,
            right: None,
        }
    }

    pub fn leaf(expression: Expression) -> Self {
        Self {
            bool_operator: None,
            expression: Some(expression),
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.expression.is_some()
    }

    /// A wrapper node carries only a left child; it stands for that child.
    pub fn is_passthrough(&self) -> bool {
        self.expression.is_none() && self.left.is_some() && self.right.is_none()
    }
}

struct GroupFrame {
    node: Box<Node>,
    pending: BoolOperator,
}

/// Incremental tree builder driven by the parser.
///
/// `current` is the root of the subtree at the present group depth. Opening
/// a group parks `current` on a stack together with the boolean operator
/// that will connect the group once it closes.
pub struct TreeAssembler {
    current: Option<Box<Node>>,
    group_stack: Vec<GroupFrame>,
}

impl TreeAssembler {
    pub fn new() -> Self {
        Self {
            current: None,
            group_stack: Vec::new(),
        }
    }

    /// Replace the current node with a fresh empty one.
    pub fn begin_node(&mut self, pending: Option<BoolOperator>) {
        self.current = Some(Box::new(Node::empty(pending)));
    }

    /// Fold a finished subtree into the current node: fill `left`, else
    /// fill `right`, else lift the current node under a new parent.
    fn fold(&mut self, pending: BoolOperator, subtree: Box<Node>) {
        match self.current.take() {
            None => self.current = Some(subtree),
            Some(mut node) => {
                if node.left.is_none() {
                    node.left = Some(subtree);
                    node.bool_operator = Some(pending);
                    self.current = Some(node);
                } else if node.right.is_none() {
                    node.right = Some(subtree);
                    node.bool_operator = Some(pending);
                    self.current = Some(node);
                } else {
                    self.current = Some(Box::new(Node {
                        bool_operator: Some(pending),
                        expression: None,
                        left: Some(node),
                        right: Some(subtree),
                    }));
                }
            }
        }
    }

    /// Fold a completed leaf expression into the current node.
    pub fn fold_expression(&mut self, pending: BoolOperator, expression: Expression) {
        self.fold(pending, Box::new(Node::leaf(expression)));
    }

    /// Park the current subtree; a fresh one starts inside the group.
    pub fn open_group(&mut self, pending: BoolOperator) {
        let node = self
            .current
            .take()
            .unwrap_or_else(|| Box::new(Node::empty(Some(pending))));
        self.group_stack.push(GroupFrame { node, pending });
    }

    /// Close the innermost group, folding its subtree into the parked node
    /// with the operator recorded when the group opened. Returns false when
    /// no group is open.
    pub fn close_group(&mut self) -> bool {
        let Some(frame) = self.group_stack.pop() else {
            return false;
        };
        match self.current.take() {
            Some(subtree) => {
                self.current = Some(frame.node);
                self.fold(frame.pending, subtree);
            }
            None => self.current = Some(frame.node),
        }
        true
    }

    pub fn has_open_group(&self) -> bool {
        !self.group_stack.is_empty()
    }

    pub fn finish(self) -> Option<Box<Node>> {
        self.current
    }
}

impl Default for TreeAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{BoolOperator, Expression};

    fn expr(key: &str, value: &str) -> Expression {
        Expression::new(key, "=", value, false).unwrap()
    }

    #[test]
    fn test_single_expression_wraps_in_passthrough() {
        let mut assembler = TreeAssembler::new();
        assembler.begin_node(Some(BoolOperator::And));
        assembler.fold_expression(BoolOperator::And, expr("a", "1"));

        let root = assembler.finish().unwrap();
        assert!(root.is_passthrough());
        let left = root.left.as_ref().unwrap();
        assert!(left.is_leaf());
        assert_eq!(left.expression.as_ref().unwrap().key.raw(), "a");
    }

    #[test]
    fn test_two_expressions_fill_left_then_right() {
        let mut assembler = TreeAssembler::new();
        assembler.begin_node(Some(BoolOperator::And));
        assembler.fold_expression(BoolOperator::And, expr("a", "1"));
        assembler.fold_expression(BoolOperator::Or, expr("b", "2"));

        let root = assembler.finish().unwrap();
        assert_eq!(root.bool_operator, Some(BoolOperator::Or));
        assert!(root.left.as_ref().unwrap().is_leaf());
        assert!(root.right.as_ref().unwrap().is_leaf());
    }

    #[test]
    fn test_third_expression_lifts_root_left() {
        let mut assembler = TreeAssembler::new();
        assembler.begin_node(Some(BoolOperator::And));
        assembler.fold_expression(BoolOperator::And, expr("a", "1"));
        assembler.fold_expression(BoolOperator::And, expr("b", "2"));
        assembler.fold_expression(BoolOperator::Or, expr("c", "3"));

        let root = assembler.finish().unwrap();
        assert_eq!(root.bool_operator, Some(BoolOperator::Or));
        // Earlier tree descends to the left, new leaf on the right
        let left = root.left.as_ref().unwrap();
        assert!(!left.is_leaf());
        assert_eq!(left.bool_operator, Some(BoolOperator::And));
        assert!(root.right.as_ref().unwrap().is_leaf());
    }

    #[test]
    fn test_group_close_fills_left_first() {
        // (a=1) and b=2
        let mut assembler = TreeAssembler::new();
        assembler.begin_node(Some(BoolOperator::And));
        assembler.open_group(BoolOperator::And);
        assembler.begin_node(Some(BoolOperator::And));
        assembler.fold_expression(BoolOperator::And, expr("a", "1"));
        assert!(assembler.close_group());
        assembler.fold_expression(BoolOperator::And, expr("b", "2"));

        let root = assembler.finish().unwrap();
        assert_eq!(root.bool_operator, Some(BoolOperator::And));
        // Group subtree landed in left, not right
        let left = root.left.as_ref().unwrap();
        assert!(left.is_passthrough());
        assert_eq!(
            left.left.as_ref().unwrap().expression.as_ref().unwrap().key.raw(),
            "a"
        );
        assert!(root.right.as_ref().unwrap().is_leaf());
    }

    #[test]
    fn test_group_after_expression_fills_right() {
        // a=1 or (b=2 and c=3)
        let mut assembler = TreeAssembler::new();
        assembler.begin_node(Some(BoolOperator::And));
        assembler.fold_expression(BoolOperator::And, expr("a", "1"));
        assembler.open_group(BoolOperator::Or);
        assembler.begin_node(Some(BoolOperator::Or));
        assembler.fold_expression(BoolOperator::Or, expr("b", "2"));
        assembler.fold_expression(BoolOperator::And, expr("c", "3"));
        assert!(assembler.close_group());

        let root = assembler.finish().unwrap();
        assert_eq!(root.bool_operator, Some(BoolOperator::Or));
        assert!(root.left.as_ref().unwrap().is_leaf());
        let group = root.right.as_ref().unwrap();
        assert_eq!(group.bool_operator, Some(BoolOperator::And));
    }

    #[test]
    fn test_close_without_open_fails() {
        let mut assembler = TreeAssembler::new();
        assembler.begin_node(Some(BoolOperator::And));
        assert!(!assembler.close_group());
    }

    #[test]
    fn test_nested_groups() {
        // ((a=1))
        let mut assembler = TreeAssembler::new();
        assembler.begin_node(Some(BoolOperator::And));
        assembler.open_group(BoolOperator::And);
        assembler.begin_node(Some(BoolOperator::And));
        assembler.open_group(BoolOperator::And);
        assembler.begin_node(Some(BoolOperator::And));
        assembler.fold_expression(BoolOperator::And, expr("a", "1"));
        assert!(assembler.close_group());
        assert!(assembler.close_group());
        assert!(!assembler.has_open_group());

        let root = assembler.finish().unwrap();
        let mut node = root.as_ref();
        while node.is_passthrough() {
            node = node.left.as_ref().unwrap();
        }
        assert!(node.is_leaf());
    }
}
