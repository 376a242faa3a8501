//! Tests for the deferred backend: stage fusion, flush triggers, and
//! the observable equivalence with eager execution.

use approx::assert_abs_diff_eq;
use rand::Rng;

use alpine::algebra::identities::Zero;
use alpine::{Add, AlpError, Descriptor, LazyContext, Monoid, Mul, PlusTimes};

/// Stages touching a shared container fuse into one pipeline and
/// produce the same values the eager primitives would.
#[test]
fn fusion_and_flush() {
    let mut ctx = LazyContext::<f64>::new();
    let x = ctx.vector(64).unwrap();
    let y = ctx.vector(64).unwrap();
    let z = ctx.vector(64).unwrap();
    ctx.set_value(x, 3.0).unwrap();
    ctx.set_value(y, 4.0).unwrap();
    ctx.ewise_apply(z, x, y, Add).unwrap();
    assert_eq!(ctx.num_pipelines(), 1);

    ctx.wait().unwrap();
    assert_eq!(ctx.num_pipelines(), 0);
    assert_eq!(ctx.read(z).unwrap(), vec![7.0; 64]);
}

/// `wait` is idempotent; flushing with nothing pending is a no-op.
#[test]
fn wait_is_idempotent() {
    let mut ctx = LazyContext::<f64>::new();
    let x = ctx.vector(8).unwrap();
    ctx.set_value(x, 1.0).unwrap();
    ctx.wait().unwrap();
    ctx.wait().unwrap();
    ctx.wait_on(x).unwrap();
    assert_eq!(ctx.read(x).unwrap(), vec![1.0; 8]);
}

/// A scalar reduction leaves the deferred world, so it forces the
/// pipeline feeding it to run first.
#[test]
fn scalar_read_forces_flush() {
    let mut ctx = LazyContext::<f64>::new();
    let x = ctx.vector(1000).unwrap();
    let y = ctx.vector(1000).unwrap();
    ctx.set_value(x, 2.0).unwrap();
    ctx.set_value(y, 0.5).unwrap();
    let d = ctx.dot(x, y, &PlusTimes::new()).unwrap();
    assert_abs_diff_eq!(d, 1000.0, epsilon = 1e-9);
    assert_eq!(ctx.num_pipelines(), 0);
}

/// Deferred results agree with a direct computation on random data,
/// including across tile boundaries.
#[test]
fn deferred_matches_direct() {
    let mut rng = rand::thread_rng();
    let n = 4096;
    let a: Vec<f64> = (0..n).map(|_| rng.r#gen()).collect();
    let b: Vec<f64> = (0..n).map(|_| rng.r#gen()).collect();

    let mut ctx = LazyContext::<f64>::new();
    let ha = ctx.vector_from(&a).unwrap();
    let hb = ctx.vector_from(&b).unwrap();
    let hc = ctx.vector(n).unwrap();
    ctx.ewise_apply(hc, ha, hb, Mul).unwrap();
    ctx.foldl(hc, ha, Add).unwrap();
    let total = ctx.fold_scalar(hc, &Monoid::<Add, Zero>::new()).unwrap();

    let expected: f64 = a.iter().zip(&b).map(|(p, q)| p * q + p).sum();
    assert_abs_diff_eq!(total, expected, epsilon = 1e-7);
}

/// An uninitialized input marks the output uninitialized instead of
/// failing; reading such an output is refused.
#[test]
fn uninitialized_propagation() {
    let mut ctx = LazyContext::<f64>::new();
    let fresh = ctx.vector(16).unwrap();
    let out = ctx.vector(16).unwrap();
    ctx.set_copy(out, fresh).unwrap();
    assert!(!ctx.initialized(out).unwrap());
    assert!(matches!(ctx.read(out), Err(AlpError::Illegal(_))));
}

/// With the dense descriptor the same situation is a contract
/// violation, surfaced when the pipeline flushes.
#[test]
fn dense_descriptor_violation() {
    let mut ctx = LazyContext::<f64>::new();
    let fresh = ctx.vector(16).unwrap();
    let full = ctx.vector_from(&[1.0; 16]).unwrap();
    let out = ctx.vector(16).unwrap();
    ctx.ewise_apply_desc(out, fresh, full, Add, Descriptor::DENSE).unwrap();
    assert!(matches!(ctx.wait(), Err(AlpError::Illegal(_))));
    ctx.wait().unwrap();
}

/// Output aliasing an input of an out-of-place stage is refused at
/// enqueue time.
#[test]
fn aliased_output_is_illegal() {
    let mut ctx = LazyContext::<f64>::new();
    let x = ctx.vector_from(&[1.0; 8]).unwrap();
    let y = ctx.vector_from(&[2.0; 8]).unwrap();
    assert!(matches!(ctx.ewise_apply(x, x, y, Add), Err(AlpError::Illegal(_))));
}

/// Pipelines over different lengths stay separate; flushing one leaves
/// the other pending.
#[test]
fn per_container_flush() {
    let mut ctx = LazyContext::<f64>::new();
    let short = ctx.vector(8).unwrap();
    let long = ctx.vector(32).unwrap();
    ctx.set_value(short, 1.0).unwrap();
    ctx.set_value(long, 2.0).unwrap();
    assert_eq!(ctx.num_pipelines(), 2);
    ctx.wait_on(short).unwrap();
    assert_eq!(ctx.num_pipelines(), 1);
    assert_eq!(ctx.read(long).unwrap(), vec![2.0; 32]);
}
