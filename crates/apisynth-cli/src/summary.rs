//! Human-readable run summary

use std::fmt::{self, Write};

use apisynth_core::{GroupOutcome, RunReport, WriteOutcome};

pub(crate) fn render_summary(report: &RunReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_summary(&mut out, report)?;
    Ok(out)
}

fn write_summary<W: Write>(out: &mut W, report: &RunReport) -> fmt::Result {
    for group in &report.groups {
        let class = group.identity.class_name();
        match &group.result {
            Ok(GroupOutcome { plan, write }) => {
                let status = match write {
                    Some(WriteOutcome::Written { path, .. }) => format!("wrote {}", path.display()),
                    Some(WriteOutcome::Unchanged) => "unchanged".to_string(),
                    None => "dry run".to_string(),
                };
                writeln!(
                    out,
                    "{class}: {} added, {} skipped ({status})",
                    plan.insertion_count(),
                    plan.skipped_count()
                )?;
                for decision in plan.decisions() {
                    writeln!(out, "  {decision}")?;
                }
            }
            Err(e) => writeln!(out, "{class}: FAILED: {e}")?,
        }
    }

    for rejected in &report.rejected {
        writeln!(out, "skipped operation: {rejected}")?;
    }
    for unresolved in &report.unresolved {
        writeln!(out, "unanswered conflict: {unresolved}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apisynth_composition::FixedResolver;
    use apisynth_core::{EndpointCatalog, EndpointOperation, HttpMethod, SynthConfig, SynthesisEngine};
    use pretty_assertions::assert_eq;

    #[test]
    fn dry_run_summary() {
        let catalog: EndpointCatalog = vec![
            EndpointOperation::new(HttpMethod::Get, "/users", Vec::<String>::new()),
            EndpointOperation::new(HttpMethod::Post, "", Vec::<String>::new()),
        ]
        .into_iter()
        .collect();
        let config = SynthConfig::default()
            .with_test_source_dir("does/not/exist")
            .with_dry_run(true);

        let report = SynthesisEngine::new(config).run(&catalog, &mut FixedResolver::decline_all());

        assert_eq!(
            render_summary(&report).unwrap(),
            "GETTests: 1 added, 0 skipped (dry run)\n  \
             add testGET_users\n\
             skipped operation: invalid operation POST \"\": empty path\n"
        );
    }

    /// Accepts `room` bytes, then fails
    struct Bounded {
        room: usize,
    }

    impl Write for Bounded {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            self.room = self.room.checked_sub(s.len()).ok_or(fmt::Error)?;
            Ok(())
        }
    }

    #[test]
    fn writer_errors_propagate() {
        let catalog: EndpointCatalog =
            vec![EndpointOperation::new(HttpMethod::Put, "", Vec::<String>::new())]
                .into_iter()
                .collect();
        let report = SynthesisEngine::new(SynthConfig::default().with_dry_run(true))
            .run(&catalog, &mut FixedResolver::decline_all());

        assert_eq!(write_summary(&mut Bounded { room: 4 }, &report), Err(fmt::Error));
        assert_eq!(write_summary(&mut Bounded { room: 4096 }, &report), Ok(()));
    }
}
