//! Scalar node: one real value, its gradient accumulator, and graph edges.

use std::cell::RefCell;
use std::collections::HashSet;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

/// Graph node state. `parents` are the operands that produced this value;
/// `local_grads[i]` is the partial derivative of this value with respect to
/// `parents[i]`, evaluated at the operand values seen during the forward pass.
/// The two lists are always the same length; leaves have neither.
struct Node {
    data: f64,
    grad: f64,
    parents: Vec<Scalar>,
    local_grads: Vec<f64>,
}

/// Handle to a scalar node in the autograd computation graph.
///
/// Cloning is cheap (`Rc`); all handles to a node share its value and its
/// gradient accumulator. Arithmetic is available through `std::ops` on
/// references (`&a + &b`, `&a * 2.0`); `pow`, `log`, `exp`, and `relu` are
/// inherent methods. Bare `f64` operands are wrapped as constant leaves.
///
/// No domain checks are performed: `log` of a non-positive value, division by
/// zero, or fractional powers of negative bases simply produce non-finite
/// values that flow through the graph.
#[derive(Clone)]
pub struct Scalar(Rc<RefCell<Node>>);

impl Scalar {
    /// Creates a leaf node (no parents) with the given value and zero gradient.
    #[must_use]
    pub fn new(data: f64) -> Self {
        Scalar::with_parents(data, Vec::new(), Vec::new())
    }

    fn with_parents(data: f64, parents: Vec<Scalar>, local_grads: Vec<f64>) -> Self {
        debug_assert_eq!(parents.len(), local_grads.len());
        Scalar(Rc::new(RefCell::new(Node {
            data,
            grad: 0.0,
            parents,
            local_grads,
        })))
    }

    /// Forward-pass value.
    #[must_use]
    pub fn data(&self) -> f64 {
        self.0.borrow().data
    }

    /// Gradient of the terminal node with respect to this one; populated by
    /// [`Scalar::backward`], accumulates across uses.
    #[must_use]
    pub fn grad(&self) -> f64 {
        self.0.borrow().grad
    }

    /// Overwrites the forward value in place (optimizer updates).
    pub fn set_data(&self, data: f64) {
        self.0.borrow_mut().data = data;
    }

    /// Resets the gradient accumulator to 0 (after an optimizer step).
    pub fn zero_grad(&self) {
        self.0.borrow_mut().grad = 0.0;
    }

    /// Power: `self^exp`. Local grad is `exp * self^(exp-1)`.
    #[must_use]
    pub fn pow(&self, exp: f64) -> Scalar {
        let data = self.data().powf(exp);
        let local_grad = exp * self.data().powf(exp - 1.0);
        Scalar::with_parents(data, vec![self.clone()], vec![local_grad])
    }

    /// Natural log. Local grad is `1/self`.
    #[must_use]
    pub fn log(&self) -> Scalar {
        let data = self.data().ln();
        let local_grad = 1.0 / self.data();
        Scalar::with_parents(data, vec![self.clone()], vec![local_grad])
    }

    /// Exponential. Local grad is `exp(self)`.
    #[must_use]
    pub fn exp(&self) -> Scalar {
        let data = self.data().exp();
        Scalar::with_parents(data, vec![self.clone()], vec![data])
    }

    /// ReLU: `max(0, self)`. Local grad is 1 if `self > 0`, else 0.
    #[must_use]
    pub fn relu(&self) -> Scalar {
        let data = self.data().max(0.0);
        let local_grad = if self.data() > 0.0 { 1.0 } else { 0.0 };
        Scalar::with_parents(data, vec![self.clone()], vec![local_grad])
    }

    /// Reverse-mode differentiation from this node.
    ///
    /// Builds a post-order topological order over the reachable subgraph with
    /// an explicit work stack (a node is emitted only after all its parents),
    /// memoized by node identity so each node is visited once even when it
    /// feeds several consumers — as cached keys and values do in attention.
    /// Sets this node's gradient to 1, then walks the order in reverse,
    /// accumulating `local_grad * grad` into each parent. Gradients add up
    /// across uses, which is what makes parameter reuse correct.
    pub fn backward(&self) {
        let mut order: Vec<Scalar> = Vec::new();
        let mut visited: HashSet<*const RefCell<Node>> = HashSet::new();
        // (node, expanded): a node is pushed once to expand its parents and a
        // second time, after them, to take its place in the order.
        let mut stack: Vec<(Scalar, bool)> = vec![(self.clone(), false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                order.push(node);
                continue;
            }
            if !visited.insert(Rc::as_ptr(&node.0)) {
                continue;
            }
            stack.push((node.clone(), true));
            for parent in &node.0.borrow().parents {
                stack.push((parent.clone(), false));
            }
        }

        self.0.borrow_mut().grad = 1.0;

        for node in order.iter().rev() {
            let node_grad = node.grad();
            let borrowed = node.0.borrow();
            for (parent, &local_grad) in borrowed.parents.iter().zip(&borrowed.local_grads) {
                parent.0.borrow_mut().grad += local_grad * node_grad;
            }
        }
    }
}

// Arithmetic on references: `&a + &b` etc. Each op records its operands and
// their analytic partials so backward can replay the chain rule.

impl Add for &Scalar {
    type Output = Scalar;

    fn add(self, rhs: Self) -> Scalar {
        Scalar::with_parents(
            self.data() + rhs.data(),
            vec![self.clone(), rhs.clone()],
            vec![1.0, 1.0],
        )
    }
}

impl Mul for &Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Self) -> Scalar {
        Scalar::with_parents(
            self.data() * rhs.data(),
            vec![self.clone(), rhs.clone()],
            vec![rhs.data(), self.data()],
        )
    }
}

impl Neg for &Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        self * -1.0
    }
}

impl Sub for &Scalar {
    type Output = Scalar;

    fn sub(self, rhs: Self) -> Scalar {
        self + &(-rhs)
    }
}

impl Div for &Scalar {
    type Output = Scalar;

    fn div(self, rhs: Self) -> Scalar {
        self * &rhs.pow(-1.0)
    }
}

// Bare numeric right-hand operands become constant leaves.

impl Add<f64> for &Scalar {
    type Output = Scalar;

    fn add(self, rhs: f64) -> Scalar {
        self + &Scalar::new(rhs)
    }
}

impl Sub<f64> for &Scalar {
    type Output = Scalar;

    fn sub(self, rhs: f64) -> Scalar {
        self + (-rhs)
    }
}

impl Mul<f64> for &Scalar {
    type Output = Scalar;

    fn mul(self, rhs: f64) -> Scalar {
        self * &Scalar::new(rhs)
    }
}

impl Div<f64> for &Scalar {
    type Output = Scalar;

    fn div(self, rhs: f64) -> Scalar {
        self / &Scalar::new(rhs)
    }
}
