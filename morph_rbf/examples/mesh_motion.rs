use faer::Mat;
use morph_rbf::{
    MotionDamping, RBFInterpolator, create_evaluation_grid, generate_random_points,
    interpolant_config::InterpolantSettings, progress::closure_sink,
};
use morph_rbf_kernels::KernelType;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Boundary points scattered over the surface of a unit sphere
    let num_points = 200usize;
    let raw = generate_random_points(num_points, 3, Some(42));
    let points = Mat::from_fn(num_points, 3, |i, j| {
        let p = [raw[(i, 0)] - 0.5, raw[(i, 1)] - 0.5, raw[(i, 2)] - 0.5];
        let norm = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt().max(1e-12);
        p[j] / norm
    });

    // Rotate the sphere by 5 degrees about z
    let (s, c) = 5f64.to_radians().sin_cos();
    let displacements = Mat::from_fn(num_points, 3, |i, j| {
        let (x, y) = (points[(i, 0)], points[(i, 1)]);
        match j {
            0 => c * x - s * y - x,
            1 => s * x + c * y - y,
            _ => 0.0,
        }
    });

    // IMQB kernel with linear terms, fading out between radius 1.5 and 4
    let interpolant_settings = InterpolantSettings::builder(KernelType::IMQB)
        .radius(0.5)
        .polynomials(true)
        .damping(MotionDamping::new(vec![0.0, 0.0, 0.0], 1.5, 4.0))
        .build()?;

    let (progress, listener) = closure_sink(16, |msg| println!("{:?}", msg));

    // Setup and solve the RBF
    let mut rbfi = RBFInterpolator::builder(points, displacements.clone(), interpolant_settings)
        .progress_callback(progress.clone())
        .build()?;

    // Move the volume nodes of a surrounding grid
    let n = 20;
    let volume_nodes = create_evaluation_grid(&[(-4.0, 4.0), (-4.0, 4.0), (-4.0, 4.0)], &[n, n, n]);
    let moved = rbfi.evaluate(&volume_nodes)?;

    let max_motion = moved
        .row_iter()
        .map(|r| r.iter().map(|v| v * v).sum::<f64>().sqrt())
        .fold(0.0, f64::max);
    println!("largest volume node displacement: {:.4}", max_motion);

    // Double the rotation at the same boundary points, reusing the factorisation
    rbfi.update_values(Mat::from_fn(num_points, 3, |i, j| 2.0 * displacements[(i, j)]))?;
    let _doubled = rbfi.evaluate(&volume_nodes)?;

    drop(rbfi);
    drop(progress);
    let _ = listener.join();

    Ok(())
}
