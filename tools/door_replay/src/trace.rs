use std::io::BufRead;

use anyhow::{bail, Context, Result};
use garage_door_monitor::{door::parse_state_label, AccelSample, DoorState};

pub const TRACE_HEADER: &str = "accel,ms,x,y,z,valid";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceSample {
    pub ms: u64,
    pub sample: AccelSample,
}

/// Reads `accel,ms,x,y,z,valid` lines. Blank lines, `#` comments, the header
/// and rows tagged with anything other than `accel` are skipped.
pub fn parse_trace(reader: impl BufRead) -> Result<Vec<TraceSample>> {
    let mut out: Vec<TraceSample> = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == TRACE_HEADER {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts[0] != "accel" {
            continue;
        }
        if parts.len() != 6 {
            bail!("line {line_no}: expected 6 columns, got {}", parts.len());
        }

        let ms = parts[1]
            .parse::<u64>()
            .with_context(|| format!("line {line_no}: invalid ms `{}`", parts[1]))?;
        let x = parse_axis(parts[2], line_no, "x")?;
        let y = parse_axis(parts[3], line_no, "y")?;
        let z = parse_axis(parts[4], line_no, "z")?;
        let valid = match parts[5] {
            "1" | "true" => true,
            "0" | "false" => false,
            other => bail!("line {line_no}: invalid valid flag `{other}`"),
        };

        if let Some(prev) = out.last().map(|s| s.ms) {
            if ms < prev {
                bail!("line {line_no}: ms {ms} goes backwards from {prev}");
            }
        }

        out.push(TraceSample {
            ms,
            sample: AccelSample { x, y, z, valid },
        });
    }
    Ok(out)
}

fn parse_axis(raw: &str, line_no: usize, name: &str) -> Result<f32> {
    raw.parse::<f32>()
        .with_context(|| format!("line {line_no}: invalid {name} `{raw}`"))
}

/// One state tag per line (`CLOSED`, `OPENING`, ...), `#` comments allowed.
pub fn parse_expected_states(reader: impl BufRead) -> Result<Vec<DoorState>> {
    let mut out = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(state) = parse_state_label(trimmed) else {
            bail!("line {line_no}: unknown state tag `{trimmed}`");
        };
        out.push(state);
    }
    Ok(out)
}
