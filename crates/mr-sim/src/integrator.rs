//! Fixed-step time integration.

use mr_physics::ReactorState;

/// Forward Euler (explicit, 1st order): `x_new = x + xdot * dt`.
///
/// Stability is the caller's responsibility through the choice of `dt`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl ForwardEuler {
    pub fn step(&self, x: &ReactorState, xdot: &ReactorState, dt: f64) -> ReactorState {
        x.add(&xdot.scale(dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mr_physics::STATE_LEN;

    #[test]
    fn euler_step_is_linear() {
        let x = ReactorState::from([1.0; STATE_LEN]);
        let xdot = ReactorState::from([-2.0; STATE_LEN]);
        let next = ForwardEuler.step(&x, &xdot, 0.25);
        assert!(next.0.iter().all(|&v| v == 0.5));
    }
}
