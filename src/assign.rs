use anyhow::{Context, bail};
use vtaxi_core::prelude::{
    Assignment, AssignmentRequest, GateRequest, MovementType, PositionAssigner,
};

use crate::cli::AssignArgs;

fn request(args: &AssignArgs) -> AssignmentRequest {
    AssignmentRequest {
        movement: args.movement.into(),
        configuration: args.config.clone(),
        runway_point: args.runway_point.clone(),
        gate: GateRequest {
            gate: args.gate.clone(),
            terminal: args.terminal.clone(),
            exclude_gates: args.exclude_gates.clone(),
            exclude_terminals: args.exclude_terminals.clone(),
        },
    }
}

/// Human readable summary of a complete assignment
pub fn describe(assignment: &Assignment) -> Vec<String> {
    let departure = assignment.movement == MovementType::Departure.as_str();
    let mut lines = vec![format!("Configuration: {}", assignment.configuration_name)];
    if departure {
        lines.push(format!("Departure Runway: {}", assignment.runway));
    } else {
        lines.push(format!("Arrival Runway: {}", assignment.runway));
    }
    if let (Some(gate), Some(point)) = (&assignment.gate, &assignment.runway_point) {
        if departure {
            lines.push(format!("Starting Gate: {}", gate.gate_id));
            lines.push(format!("Runway Entrance: {point}"));
        } else {
            lines.push(format!("Runway Exit: {point}"));
            lines.push(format!("Destination Gate: {}", gate.gate_id));
        }
    }
    lines
}

/// Assigns a gate and runway point for one movement and prints the result
///
/// # Errors
///
/// Returns an error if the airport data cannot be loaded, the configuration is
/// unknown, or no suitable positions exist.
pub fn run(args: &AssignArgs) -> anyhow::Result<()> {
    let assigner = PositionAssigner::from_path(&args.airport_data).with_context(|| {
        format!(
            "failed to load airport data from {}",
            args.airport_data.display()
        )
    })?;

    let assignment = assigner.assign(&request(args), &mut rand::rng())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assignment)?);
    } else {
        println!("Final Assignment:");
        println!("-----------------");
        for line in describe(&assignment) {
            println!("{line}");
        }
    }

    if !assignment.is_complete() {
        bail!("Could not find suitable positions");
    }
    Ok(())
}
