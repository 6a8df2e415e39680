use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use trapezoid_expr::config::IntegralConfig;

/// Integrate a formula in `x` with the composite trapezoidal rule.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML file with `function`, `intervals`, `initial_x`, `end_x`, `output`.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Formula to integrate.
    #[arg(long)]
    function: Option<String>,
    /// Number of subintervals.
    #[arg(long)]
    intervals: Option<usize>,
    /// Lower bound.
    #[arg(long, allow_hyphen_values = true)]
    from: Option<f64>,
    /// Upper bound.
    #[arg(long, allow_hyphen_values = true)]
    to: Option<f64>,
    /// Chart output path.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print the result without rendering a chart.
    #[arg(long)]
    no_chart: bool,
}

impl Args {
    fn into_config(self) -> Result<(IntegralConfig, bool), Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => IntegralConfig::from_file(path)?,
            None => IntegralConfig::default(),
        };
        if let Some(function) = self.function {
            config.function = function;
        }
        if let Some(intervals) = self.intervals {
            config.intervals = intervals;
        }
        if let Some(from) = self.from {
            config.initial_x = from;
        }
        if let Some(to) = self.to {
            config.end_x = to;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        config.validate()?;
        Ok((config, !self.no_chart))
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let (config, draw_chart) = args.into_config()?;
    let mut integral = config.to_integral();
    let result = integral.calculate()?;
    println!("{result}");

    if draw_chart {
        render(&integral, &config)?;
    }
    Ok(())
}

#[cfg(feature = "chart")]
fn render(
    integral: &trapezoid_expr::DiscreteIntegral,
    config: &IntegralConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    trapezoid_expr::chart::render_png(integral, &config.output)?;
    log::info!("Chart written to {}", config.output.display());
    Ok(())
}

#[cfg(not(feature = "chart"))]
fn render(
    _integral: &trapezoid_expr::DiscreteIntegral,
    config: &IntegralConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    log::warn!(
        "Built without the `chart` feature, not writing {}",
        config.output.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_file() {
        let path = std::env::temp_dir().join("trapezoid_expr_flags_override.toml");
        std::fs::write(
            &path,
            "function = \"sin(x)\"\nintervals = 64\ninitial_x = 0.0\nend_x = 2.0\n",
        )
        .unwrap();

        let args = Args::try_parse_from([
            "trapezoid-expr",
            "--config",
            path.to_str().unwrap(),
            "--intervals",
            "8",
            "--from",
            "-1.5",
            "--no-chart",
        ])
        .unwrap();
        let (config, draw_chart) = args.into_config().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.function, "sin(x)");
        assert_eq!(config.intervals, 8);
        assert_eq!(config.initial_x, -1.5);
        assert_eq!(config.end_x, 2.0);
        assert_eq!(config.output, PathBuf::from("output.png"));
        assert!(!draw_chart);
    }

    #[test]
    fn defaults_without_flags() {
        let args = Args::try_parse_from(["trapezoid-expr"]).unwrap();
        let (config, draw_chart) = args.into_config().unwrap();
        assert_eq!(config, IntegralConfig::default());
        assert!(draw_chart);
    }

    #[test]
    fn overrides_are_validated() {
        let path = std::env::temp_dir().join("trapezoid_expr_zero_override.toml");
        std::fs::write(&path, "intervals = 10\n").unwrap();

        let args = Args::try_parse_from([
            "trapezoid-expr",
            "--config",
            path.to_str().unwrap(),
            "--intervals",
            "0",
        ])
        .unwrap();
        let result = args.into_config();
        let _ = std::fs::remove_file(&path);
        assert!(result.is_err());
    }
}
