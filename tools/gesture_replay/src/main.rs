use std::{env, path::PathBuf, process};

use gesture_replay::{parse_expected, parse_trace, render_list, replay};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let mut trace_path: Option<PathBuf> = None;
    let mut expected: Option<Vec<&'static str>> = None;

    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--expect" => {
                idx += 1;
                let Some(value) = args.get(idx) else {
                    return Err("missing value after --expect".into());
                };
                expected = Some(parse_expected(value)?);
            }
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            value if value.starts_with('-') => {
                return Err(format!("unknown argument: {value}"));
            }
            value => {
                if trace_path.is_some() {
                    return Err("multiple trace paths provided".into());
                }
                trace_path = Some(PathBuf::from(value));
            }
        }
        idx += 1;
    }

    let trace_path = trace_path.ok_or_else(usage)?;
    let steps = parse_trace(&trace_path)?;
    let outcome = replay(&steps)?;

    println!("detection,session,gesture,source");
    for detection in &outcome.detections {
        println!(
            "detection,{},{},{:?}",
            detection.session,
            detection.gesture.label(),
            detection.source
        );
    }
    println!(
        "# {} steps, {} detections, last sample at {} ms",
        steps.len(),
        outcome.detections.len(),
        outcome.last_sample_ms
    );

    if let Some(expected) = expected {
        let actual = outcome.labels();
        if actual != expected {
            eprintln!("expected gestures: {}", render_list(&expected));
            eprintln!("actual gestures:   {}", render_list(&actual));
            return Err("detection sequence mismatch".into());
        }
    }

    Ok(())
}

fn usage() -> String {
    "usage: gesture_replay <trace.txt> [--expect <gesture[,gesture...]|none>]".to_string()
}
