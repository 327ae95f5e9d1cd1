use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

fn success_rate(results: &[ScenarioResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    #[allow(clippy::cast_precision_loss)]
    let rate = passed as f64 / results.len() as f64;
    rate * 100.0
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Expedition Test Results".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Summit Expedition Test Results\n")?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(out, "### {status} {} (seed {})\n", result.scenario_name, result.seed)?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn generate_csv_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(
        out,
        "scenario,seed,passed,iterations_run,successful_iterations,average_ms,first_failure"
    )?;
    for result in results {
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            csv_field(&result.scenario_name),
            result.seed,
            result.passed,
            result.iterations_run,
            result.successful_iterations,
            result.average_duration.as_millis(),
            csv_field(result.failures.first().map_or("", String::as_str))
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "Storm, Front".to_string(),
            seed: 42,
            passed,
            iterations_run: 2,
            successful_iterations: usize::from(passed) * 2,
            failures: if passed {
                Vec::new()
            } else {
                vec!["tick 3: \"bad\"".to_string()]
            },
            average_duration: Duration::from_millis(3),
            performance_data: Vec::new(),
        }
    }

    #[test]
    fn csv_quotes_awkward_fields() {
        let mut buf = Vec::new();
        generate_csv_report(&mut buf, &[sample(false)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Storm, Front\",42,false,2,0,3,"));
        assert!(row.ends_with("\"tick 3: \"\"bad\"\"\""));
    }

    #[test]
    fn json_report_round_trips() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &[sample(true)]).unwrap();
        let parsed: Vec<ScenarioResult> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].passed);
    }

    #[test]
    fn markdown_and_console_mention_each_run() {
        let results = [sample(true), sample(false)];
        let mut md = Vec::new();
        generate_markdown_report(&mut md, &results).unwrap();
        let md = String::from_utf8(md).unwrap();
        assert!(md.contains("**Success rate**: 50.0%"));
        assert!(md.contains("tick 3"));

        let mut console = Vec::new();
        generate_console_report(&mut console, &results, Duration::from_millis(9)).unwrap();
        let console = String::from_utf8(console).unwrap();
        assert!(console.contains("Total runs: 2"));
        assert!(console.contains("Performance Summary"));
    }
}
