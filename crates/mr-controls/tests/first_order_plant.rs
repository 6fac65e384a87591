//! Integration test: both control laws regulate a first-order plant.
//!
//! Plant: `dy/dt = (u / 100 - y) / tau`, so a drum angle of 50 holds y = 0.5.

use mr_controls::{Controller, ControllerConfig};

fn simulate(config: &ControllerConfig, setpoint: f64, t_end: f64) -> (f64, Vec<f64>) {
    let mut controller = Controller::from_config(config).unwrap();
    let dt = 0.01;
    let tau = 1.0;
    let mut y = 0.0;
    let mut u = controller.last_command();
    let mut commands = vec![u];
    let steps = (t_end / dt).round() as usize;
    for i in 0..steps {
        let t = i as f64 * dt;
        y += dt * (u / 100.0 - y) / tau;
        u = controller.update(t, y, setpoint);
        commands.push(u);
    }
    (y, commands)
}

#[test]
fn pid_tracks_setpoint() {
    let cfg = ControllerConfig::Pid {
        kp: 50.0,
        ki: 50.0,
        kd: 0.0,
        kaw: 1.0,
        t_c: 0.1,
        max_val: 100.0,
        min_val: 0.0,
        max_rate: 100.0,
        u0: 0.0,
    };
    let (y, commands) = simulate(&cfg, 0.5, 40.0);
    assert!((y - 0.5).abs() < 1e-3, "final output {y}");
    assert!(commands.iter().all(|u| (0.0..=100.0).contains(u)));
}

#[test]
fn supertwisting_reaches_sliding_band() {
    let cfg = ControllerConfig::Supertwisting {
        lambda: 5.0,
        w: 5.0,
        t_c: 0.5,
        max_val: 100.0,
        min_val: 0.0,
        max_rate: 20.0,
        u0: 0.0,
    };
    let (y, commands) = simulate(&cfg, 0.5, 60.0);
    // Switching term chatters around the target; allow a small band.
    assert!((y - 0.5).abs() < 0.05, "final output {y}");
    for pair in commands.windows(2) {
        assert!((pair[1] - pair[0]).abs() <= 20.0 * 0.01 + 1e-9);
    }
}
