//! # Path Control Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use hwy_lib::{
    path_ctrl::{KinematicLimits, PathCtrl},
    sim::{lane_centre_d_m, pose_on_track, LaneKeep, RefSpeed, SimVehicle},
    track::{Track, Waypoint},
};
use nalgebra::Vector2;

fn path_ctrl_benchmark(c: &mut Criterion) {
    // ---- Build a ring track ----

    let radius_m = 300.0;
    let waypoints: Vec<Waypoint> = (0..60)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / 60.0;
            Waypoint {
                s_m: radius_m * theta,
                position_m: Vector2::new(radius_m * theta.cos(), radius_m * theta.sin()),
                normal: Vector2::new(theta.cos(), theta.sin()),
            }
        })
        .collect();
    let track = Track::from_waypoints(&waypoints).unwrap();

    let limits = KinematicLimits {
        speed_limit_ms: 22.0,
        accel_limit_mss: 10.0,
        jerk_limit_msss: 10.0,
    };

    // ---- Drive a few cycles to get a realistic history ----

    let lane_keep = LaneKeep::new(1, 6, 10.0);
    let mut ref_speed = RefSpeed::new(0.5, limits.speed_limit_ms);
    let mut vehicle = SimVehicle::new(pose_on_track(&track, 10.0, lane_centre_d_m(1)), 5);

    for _ in 0..20 {
        hwy_lib::sim::step_cycle(&track, limits, &mut vehicle, &lane_keep, &mut ref_speed)
            .unwrap();
    }

    let history = vehicle.previous_path().to_vec();
    let mut path_ctrl = PathCtrl::new(&track, vehicle.pose(), limits);
    path_ctrl.update_path_history(&history).unwrap();
    let start = path_ctrl.end_of_history_sdv();
    let trajectory = lane_keep.plan(&track, &start, ref_speed.speed_ms());

    // Full recalculation, 5 new points after a 45 point history
    c.bench_function("PathCtrl::update_trajectory", |b| {
        b.iter(|| path_ctrl.update_trajectory(trajectory.clone()).unwrap())
    });

    let position_m = vehicle.pose().position_m;
    c.bench_function("Track::xy_to_sd", |b| b.iter(|| track.xy_to_sd(&position_m)));
}

criterion_group!(benches, path_ctrl_benchmark);
criterion_main!(benches);
