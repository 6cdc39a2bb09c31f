use diffsim_kinematics::*;

fn main() {
    let params = DriveParams {
        wheel_accel: 0.5,
        ..DriveParams::default()
    };
    let dt = 0.1; // Time step in seconds
    let num_steps = 30;

    match DifferentialDriveKinematics::from_params(&params) {
        Ok(mut robot) => {
            println!("Initializing simulation...");
            println!("  Differential Drive Parameters:");
            println!("    Wheel Base:     {} m", robot.wheel_base());
            println!("    Wheel Diameter: {} m", robot.left().diameter());
            println!("    Wheel Accel:    {} m/s^2", params.wheel_accel);
            println!("  Initial Pose:     {}", robot.get_pose());
            println!("  Time Step:        {} s", dt);
            println!("  Num Steps:        {}", num_steps);
            println!("\nSimulating...");

            robot.command_velocity(1.0, 0.0); // 1.0 m/s forward, 0 rad/s turning

            for i in 0..num_steps {
                if let Err(e) = robot.step(dt) {
                    eprintln!("Error during simulation step {}: {}", i + 1, e);
                    break;
                }
                println!(
                    "Step {:>2}: Pose: {}  Wheels: {}",
                    i + 1,
                    robot.get_pose(),
                    robot.wheel_speeds()
                );
            }

            println!("\nSimulation complete.");
            println!("Final Pose: {:?}", robot.get_pose());
            println!("Left wheel: {:.2} revolutions", robot.left().revolutions());
        }
        Err(e) => {
            eprintln!("Failed to initialize kinematics: {}", e);
        }
    }
}
