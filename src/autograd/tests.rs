//! Tests for the scalar autograd engine: analytic gradients against finite
//! differences, topological order, accumulation through reuse, and the
//! terminal/leaf edge cases.

use crate::autograd::Scalar;
use crate::rng::SeededRng;

/// Central finite-difference estimate of df/dx at `x`.
fn numeric_grad(f: impl Fn(f64) -> f64, x: f64) -> f64 {
    let h = 1e-6;
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// Checks one unary op: builds `f` over a `Scalar`, backprops, and compares
/// the leaf gradient with the finite-difference estimate of `reference`.
fn check_unary(
    op: impl Fn(&Scalar) -> Scalar,
    reference: impl Fn(f64) -> f64 + Copy,
    inputs: &[f64],
) {
    for &x in inputs {
        let a = Scalar::new(x);
        let out = op(&a);
        out.backward();
        let expected = numeric_grad(reference, x);
        assert!(
            (a.grad() - expected).abs() < 1e-4,
            "grad mismatch at x={x}: analytic {} vs numeric {expected}",
            a.grad()
        );
    }
}

#[test]
fn gradcheck_add() {
    let mut rng = SeededRng::new(42);
    for _ in 0..10 {
        let x = rng.uniform() * 4.0 - 2.0;
        let y = rng.uniform() * 4.0 - 2.0;
        let a = Scalar::new(x);
        let b = Scalar::new(y);
        let out = &a + &b;
        out.backward();
        assert!((a.grad() - numeric_grad(|v| v + y, x)).abs() < 1e-4);
        assert!((b.grad() - numeric_grad(|v| x + v, y)).abs() < 1e-4);
    }
}

#[test]
fn gradcheck_mul() {
    let mut rng = SeededRng::new(42);
    for _ in 0..10 {
        let x = rng.uniform() * 4.0 - 2.0;
        let y = rng.uniform() * 4.0 - 2.0;
        let a = Scalar::new(x);
        let b = Scalar::new(y);
        let out = &a * &b;
        out.backward();
        assert!((a.grad() - numeric_grad(|v| v * y, x)).abs() < 1e-4);
        assert!((b.grad() - numeric_grad(|v| x * v, y)).abs() < 1e-4);
    }
}

#[test]
fn gradcheck_pow() {
    // Positive base keeps fractional powers in-domain.
    check_unary(|a| a.pow(3.0), |x| x.powf(3.0), &[0.5, 1.0, 1.7, 2.3]);
    check_unary(|a| a.pow(-0.5), |x| x.powf(-0.5), &[0.5, 1.0, 1.7, 2.3]);
}

#[test]
fn gradcheck_log() {
    check_unary(|a| a.log(), f64::ln, &[0.1, 0.5, 1.0, 3.0]);
}

#[test]
fn gradcheck_exp() {
    check_unary(|a| a.exp(), f64::exp, &[-2.0, -0.3, 0.0, 1.5]);
}

#[test]
fn gradcheck_relu() {
    // Away from the kink at 0, where the finite difference is well defined.
    check_unary(|a| a.relu(), |x| x.max(0.0), &[-1.5, -0.2, 0.3, 2.0]);
}

#[test]
fn backward_on_isolated_leaf() {
    let leaf = Scalar::new(5.0);
    let unrelated = Scalar::new(1.0);
    leaf.backward();
    assert_eq!(leaf.grad(), 1.0);
    assert_eq!(unrelated.grad(), 0.0);
    assert_eq!(leaf.data(), 5.0);
}

#[test]
fn gradients_accumulate_when_node_is_reused() {
    // c = a + a: dc/da = 2, reached through two edges.
    let a = Scalar::new(3.0);
    let c = &a + &a;
    c.backward();
    assert_eq!(a.grad(), 2.0);

    // d = a*a + a: dd/da = 2a + 1 = 7 at a=3.
    let a = Scalar::new(3.0);
    let d = &(&a * &a) + &a;
    d.backward();
    assert!((a.grad() - 7.0).abs() < 1e-10);
}

#[test]
fn derived_ops_backward() {
    let a = Scalar::new(6.0);
    let b = Scalar::new(2.0);
    let q = &a / &b;
    assert!((q.data() - 3.0).abs() < 1e-10);
    q.backward();
    assert!((a.grad() - 0.5).abs() < 1e-10);
    assert!((b.grad() + 1.5).abs() < 1e-10); // d(a/b)/db = -a/b^2

    let a = Scalar::new(5.0);
    let b = Scalar::new(2.0);
    let d = &a - &b;
    assert_eq!(d.data(), 3.0);
    d.backward();
    assert_eq!(a.grad(), 1.0);
    assert_eq!(b.grad(), -1.0);

    let a = Scalar::new(3.0);
    let n = -&a;
    assert_eq!(n.data(), -3.0);
    n.backward();
    assert_eq!(a.grad(), -1.0);
}

#[test]
fn f64_operands_are_constant_leaves() {
    let a = Scalar::new(2.0);
    let out = &(&(&a * 3.0) + 1.0) - 0.5;
    assert!((out.data() - 6.5).abs() < 1e-10);
    out.backward();
    assert!((a.grad() - 3.0).abs() < 1e-10);

    let a = Scalar::new(8.0);
    let out = &a / 4.0;
    assert!((out.data() - 2.0).abs() < 1e-10);
    out.backward();
    assert!((a.grad() - 0.25).abs() < 1e-10);
}

#[test]
fn zero_grad_resets_accumulator() {
    let a = Scalar::new(2.0);
    let out = &a * 3.0;
    out.backward();
    assert_eq!(a.grad(), 3.0);
    a.zero_grad();
    assert_eq!(a.grad(), 0.0);
}

#[test]
fn set_data_mutates_in_place_across_handles() {
    let a = Scalar::new(1.0);
    let alias = a.clone();
    a.set_data(4.5);
    assert_eq!(alias.data(), 4.5);
}

#[test]
fn backward_handles_deep_chains_without_recursion() {
    // A long dependency chain; the work-stack traversal must not overflow.
    let leaf = Scalar::new(1.0);
    let mut x = leaf.clone();
    for _ in 0..10_000 {
        x = &x + 0.0;
    }
    x.backward();
    assert_eq!(leaf.grad(), 1.0);
}

#[test]
fn compound_expression_gradients() {
    // loss = relu(a*b + c); a=1, b=2, c=-1 => loss = 1.
    let a = Scalar::new(1.0);
    let b = Scalar::new(2.0);
    let c = Scalar::new(-1.0);
    let loss = (&(&a * &b) + &c).relu();
    assert_eq!(loss.data(), 1.0);
    loss.backward();
    assert!((a.grad() - 2.0).abs() < 1e-10);
    assert!((b.grad() - 1.0).abs() < 1e-10);
    assert!((c.grad() - 1.0).abs() < 1e-10);
}
