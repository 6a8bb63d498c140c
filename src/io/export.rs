//! CSV export of projected result charts.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::projection::{Chart, ChartSink};

/// Column header of the chart export.
const HEADER: [&str; 5] = ["x_title", "y_title", "series", "x", "y"];

/// [`ChartSink`] writing one CSV row per plotted point.
///
/// The artifact of each plot is the number of rows it wrote. The x column
/// is written exactly; y values are rounded to 4 decimal places, so the
/// export does not preserve finer precision.
pub struct CsvChartSink<W: Write> {
    wtr: csv::Writer<W>,
    axes: (&'static str, &'static str),
}

impl<W: Write> CsvChartSink<W> {
    /// Wraps `writer` and emits the header row.
    ///
    /// # Errors
    ///
    /// Returns a `csv::Error` if the header cannot be written.
    pub fn new(writer: W) -> csv::Result<Self> {
        let mut wtr = csv::WriterBuilder::new().from_writer(writer);
        wtr.write_record(HEADER)?;
        Ok(Self {
            wtr,
            axes: ("", ""),
        })
    }

    /// Writes every series of `chart` under its axis titles.
    pub fn write_chart(&mut self, chart: &Chart) -> csv::Result<usize> {
        self.axes = (chart.x_title, chart.y_title);
        chart.render(self).into_iter().sum()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.wtr.flush()
    }
}

impl<W: Write> ChartSink for CsvChartSink<W> {
    type Artifact = csv::Result<usize>;

    fn plot(&mut self, xs: &[f64], ys: &[f64], label: &str) -> csv::Result<usize> {
        let (x_title, y_title) = self.axes;
        let mut rows = 0;
        for (x, y) in xs.iter().zip(ys) {
            let x = x.to_string();
            let y = format!("{y:.4}");
            self.wtr
                .write_record([x_title, y_title, label, x.as_str(), y.as_str()])?;
            rows += 1;
        }
        Ok(rows)
    }
}

/// Writes `charts` as CSV to any writer and returns the number of data rows.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_charts(charts: &[Chart], writer: impl Write) -> io::Result<usize> {
    let mut sink = CsvChartSink::new(writer)?;
    let mut rows = 0;
    for chart in charts {
        rows += sink.write_chart(chart)?;
    }
    sink.flush()?;
    Ok(rows)
}

/// Exports `charts` to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_charts(charts: &[Chart], path: &Path) -> io::Result<usize> {
    let file = File::create(path)?;
    write_charts(charts, io::BufWriter::new(file))
}
