use crate::integrate::DiscreteIntegral;

use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("nothing to plot, the integral has no samples")]
    NoSamples,
    #[error("cannot plot non-finite range {0}..{1}")]
    NonFinite(f64, f64),
    #[error("failed to render chart: {0}")]
    Render(String),
}

fn render_err(e: impl std::fmt::Display) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Plotters cannot draw a zero-width axis.
fn axis(range: Option<(f64, f64)>) -> Result<std::ops::Range<f64>, ChartError> {
    let (min, max) = range.ok_or(ChartError::NoSamples)?;
    if !min.is_finite() || !max.is_finite() {
        return Err(ChartError::NonFinite(min, max));
    }
    if min == max {
        return Ok(min - 1.0..max + 1.0);
    }
    Ok(min..max)
}

/// Draws the samples of a calculated integral to a PNG at `path`, titled
/// with [`DiscreteIntegral::title`].
pub fn render_png(integral: &DiscreteIntegral, path: impl AsRef<Path>) -> Result<(), ChartError> {
    let x_axis = axis(integral.x_range())?;
    let y_axis = axis(integral.y_range())?;

    let root_area = BitMapBackend::new(path.as_ref(), (800, 600)).into_drawing_area();
    root_area.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption(integral.title(), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_axis, y_axis)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("f(x)")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            integral.samples().iter().map(|s| (s.x, s.y)),
            &Palette99::pick(0),
        ))
        .map_err(render_err)?;

    root_area.present().map_err(render_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_axis_is_widened() {
        assert_eq!(axis(Some((2.0, 2.0))).unwrap(), 1.0..3.0);
        assert_eq!(axis(Some((-1.0, 4.0))).unwrap(), -1.0..4.0);
    }

    #[test]
    fn unplottable_ranges() {
        assert!(matches!(axis(None), Err(ChartError::NoSamples)));
        assert!(matches!(
            axis(Some((f64::NEG_INFINITY, 0.0))),
            Err(ChartError::NonFinite(..))
        ));

        let integral = DiscreteIntegral::new("x", 4, 0.0, 1.0);
        assert!(matches!(
            render_png(&integral, "unused.png"),
            Err(ChartError::NoSamples)
        ));
    }

    #[test]
    fn renders_reference_integral() {
        let mut integral = DiscreteIntegral::new("x / (1 + (x^2))", 1000, -5.0, 5.0);
        integral.calculate().unwrap();

        let path = std::env::temp_dir().join("trapezoid_expr_reference_chart.png");
        let _ = std::fs::remove_file(&path);
        render_png(&integral, &path).unwrap();

        let size = std::fs::metadata(&path).unwrap().len();
        assert!(size > 0, "{} is empty", path.display());
        let _ = std::fs::remove_file(&path);
    }
}
