//! The BASIC emitter: numbers the intermediate listing and resolves every
//! symbolic `REM` label against the line number of the next emitted
//! instruction. This is a second, independent pass over
//! [`crate::ir::Line`] — it never looks at the AST.
//!
//! Two scans: the first walks the listing once, handing out line numbers
//! 10, 20, 30, … to every non-`REM` line and recording, for each `REM
//! <label>`, the number of whichever numbered line follows it. The second
//! rewrites every `GOTO`/`IF … THEN` against that map. A label that two
//! `REM` lines both claim is a fatal [`EmitError`] — codegen should never
//! produce that on well-typed input. A program whose last instruction is a
//! loop or branch leaves its exit label with nothing following it in the
//! listing (no trailing `halt`); the first scan gives that label the
//! implicit end-of-program line a trailing `STOP` would otherwise have
//! provided, so the second scan still resolves it.

use rustc_hash::FxHashMap;

use crate::error::EmitError;
use crate::ir::Line;

/// Numbers `lines` and resolves labels, returning the final BASIC text —
/// one statement per line, no trailing newline.
pub fn emit_basic(lines: &[Line]) -> Result<String, EmitError> {
    let (numbered, labels) = number_lines(lines)?;
    let rendered: Result<Vec<String>, EmitError> = numbered
        .iter()
        .map(|(n, line)| render_numbered(*n, line, &labels))
        .collect();
    Ok(rendered?.join("\n"))
}

/// First pass: assigns every non-`REM` line a number and builds the
/// `label -> line number` map. A run of `REM` markers immediately before a
/// numbered line all resolve to that same line.
fn number_lines<'a>(lines: &'a [Line]) -> Result<(Vec<(u32, &'a Line)>, FxHashMap<String, u32>), EmitError> {
    let mut labels: FxHashMap<String, u32> = FxHashMap::default();
    let mut pending: Vec<&String> = Vec::new();
    let mut numbered = Vec::new();
    let mut next = 10u32;

    for line in lines {
        if let Line::Rem(label) = line {
            if labels.contains_key(label) || pending.iter().any(|p| **p == *label) {
                return Err(EmitError::DuplicateLabel(label.clone()));
            }
            pending.push(label);
            continue;
        }
        for label in pending.drain(..) {
            labels.insert(label.clone(), next);
        }
        numbered.push((next, line));
        next += 10;
    }

    if !pending.is_empty() {
        const TRAILING_STOP: Line = Line::Stop;
        for label in pending.drain(..) {
            labels.insert(label.clone(), next);
        }
        numbered.push((next, &TRAILING_STOP));
    }

    Ok((numbered, labels))
}

fn render_numbered(number: u32, line: &Line, labels: &FxHashMap<String, u32>) -> Result<String, EmitError> {
    let stmt = match line {
        Line::Print(text) => format!("PRINT {text}"),
        Line::Assign { target, expr } => format!("{target} = {expr}"),
        Line::Stop => "STOP".to_string(),
        Line::Goto(label) => format!("GOTO {}", resolve(label, labels)?),
        Line::IfThen { cond, label } => format!("IF {cond} THEN {}", resolve(label, labels)?),
        Line::Rem(_) => unreachable!("REM lines are consumed by number_lines and never numbered themselves"),
    };
    Ok(format!("{number} {stmt}"))
}

fn resolve(label: &str, labels: &FxHashMap<String, u32>) -> Result<u32, EmitError> {
    labels.get(label).copied().ok_or_else(|| EmitError::UnresolvedLabel(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_start_at_ten_and_step_by_ten() {
        let lines = vec![Line::Stop, Line::Stop, Line::Stop];
        let out = emit_basic(&lines).unwrap();
        assert_eq!(out, "10 STOP\n20 STOP\n30 STOP");
    }

    #[test]
    fn rem_line_resolves_to_its_following_numbered_line() {
        let lines = vec![
            Line::Rem("L1".to_string()),
            Line::Goto("L1".to_string()),
            Line::Stop,
        ];
        let out = emit_basic(&lines).unwrap();
        // The REM line claims no number of its own; GOTO L1 resolves to the
        // line number of the STOP that follows it.
        assert_eq!(out, "10 GOTO 10\n20 STOP");
    }

    #[test]
    fn if_then_substitutes_resolved_line_number() {
        let lines = vec![
            Line::IfThen {
                cond: "i > 0".to_string(),
                label: "WB".to_string(),
            },
            Line::Goto("WE".to_string()),
            Line::Rem("WB".to_string()),
            Line::Print("i".to_string()),
            Line::Rem("WE".to_string()),
            Line::Stop,
        ];
        let out = emit_basic(&lines).unwrap();
        assert_eq!(out, "10 IF i > 0 THEN 30\n20 GOTO 40\n30 PRINT i\n40 STOP");
    }

    #[test]
    fn unresolved_label_is_an_error() {
        let lines = vec![Line::Goto("NOPE".to_string())];
        let err = emit_basic(&lines).unwrap_err();
        assert_eq!(err, EmitError::UnresolvedLabel("NOPE".to_string()));
    }

    #[test]
    fn duplicate_rem_label_is_an_error() {
        let lines = vec![Line::Rem("L".to_string()), Line::Rem("L".to_string()), Line::Stop];
        let err = emit_basic(&lines).unwrap_err();
        assert_eq!(err, EmitError::DuplicateLabel("L".to_string()));
    }

    #[test]
    fn trailing_label_with_nothing_after_it_still_resolves() {
        // A loop whose exit label is the last thing in the listing (no
        // trailing `halt`) — `WE` has no numbered line following it.
        let lines = vec![
            Line::IfThen {
                cond: "i > 0".to_string(),
                label: "WB".to_string(),
            },
            Line::Goto("WE".to_string()),
            Line::Rem("WB".to_string()),
            Line::Print("i".to_string()),
            Line::Rem("WE".to_string()),
        ];
        let out = emit_basic(&lines).unwrap();
        // `WE` resolves to a synthesized final line — the implicit
        // end-of-program a trailing `halt`'s `STOP` would otherwise have
        // provided.
        assert_eq!(out, "10 IF i > 0 THEN 30\n20 GOTO 40\n30 PRINT i\n40 STOP");
    }
}
