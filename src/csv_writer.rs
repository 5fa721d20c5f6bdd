use anyhow::{Context, Result};
use std::io::Write;

use crate::ir::{ChartData, ChartPanel, ViewOutput};

/// Flatten a rendered view into CSV.
///
/// Layout, one block per chart:
/// ```text
/// view,brand,All Data
/// chart,sales_by_brand,Sales Value by Brand (EURO)
/// label,Brand 1,Brand 2
/// 2023,2,1
/// ```
/// Scatter charts use `dataset,x,y` rows. A chart without data has only its
/// `chart` row.
pub fn write_view<W: Write>(output: &ViewOutput, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record(["view", output.view.name(), output.filter_summary.as_str()])
        .context("Failed to write view header")?;

    for chart in &output.charts {
        write_chart(&mut wtr, chart).with_context(|| format!("Failed to write chart '{}'", chart.id))?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

fn write_chart<W: Write>(wtr: &mut csv::Writer<W>, chart: &ChartPanel) -> Result<()> {
    wtr.write_record(["chart", chart.id.as_str(), chart.title.as_str()])?;

    match &chart.data {
        None => {}
        Some(ChartData::Series(series)) => {
            let mut header = vec!["label".to_string()];
            header.extend(series.datasets.iter().map(|d| d.label.clone()));
            wtr.write_record(&header)?;

            for (i, label) in series.labels.iter().enumerate() {
                let mut row = vec![label.clone()];
                row.extend(
                    series
                        .datasets
                        .iter()
                        .map(|d| d.data.get(i).copied().unwrap_or(0.0).to_string()),
                );
                wtr.write_record(&row)?;
            }
        }
        Some(ChartData::Scatter(scatter)) => {
            wtr.write_record(["dataset", "x", "y"])?;
            for dataset in &scatter.datasets {
                for point in &dataset.points {
                    wtr.write_record([dataset.label.clone(), point.x.to_string(), point.y.to_string()])?;
                }
            }
        }
    }
    Ok(())
}

/// `write_view` into a string.
pub fn view_to_csv(output: &ViewOutput) -> Result<String> {
    let mut buf = Vec::new();
    write_view(output, &mut buf)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::View;
    use crate::ir::{
        ChartKind, ChartSeries, ColorRef, Dataset, ScatterDataset, ScatterPoint, ScatterSeries,
    };
    use crate::scale::Unit;

    fn panel(id: &str, data: Option<ChartData>) -> ChartPanel {
        ChartPanel {
            id: id.to_string(),
            title: "Title, with comma".to_string(),
            badge: None,
            kind: ChartKind::GroupedBar,
            unit: Unit::Millions,
            axes: None,
            data,
        }
    }

    #[test]
    fn test_series_block() {
        let output = ViewOutput {
            view: View::Brand,
            filter_summary: "All Data".to_string(),
            charts: vec![
                panel(
                    "sales",
                    Some(ChartData::Series(ChartSeries {
                        labels: vec!["2023".into()],
                        datasets: vec![
                            Dataset {
                                label: "Brand 1".into(),
                                data: vec![2.0],
                                color: ColorRef::Single("#FFA500".into()),
                            },
                            Dataset {
                                label: "Brand 2".into(),
                                data: vec![1.5],
                                color: ColorRef::Single("#4299E1".into()),
                            },
                        ],
                    })),
                ),
                panel("empty", None),
            ],
        };

        let csv = view_to_csv(&output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "view,brand,All Data");
        assert_eq!(lines[1], "chart,sales,\"Title, with comma\"");
        assert_eq!(lines[2], "label,Brand 1,Brand 2");
        assert_eq!(lines[3], "2023,2,1.5");
        assert_eq!(lines[4], "chart,empty,\"Title, with comma\"");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_scatter_block() {
        let output = ViewOutput {
            view: View::Correlation,
            filter_summary: "Brand: B".to_string(),
            charts: vec![panel(
                "scatter",
                Some(ChartData::Scatter(ScatterSeries {
                    datasets: vec![ScatterDataset {
                        label: "Brand 2".into(),
                        points: vec![ScatterPoint { x: 1.0, y: 0.0 }],
                        color: "#4299E1".into(),
                    }],
                })),
            )],
        };

        let csv = view_to_csv(&output).unwrap();
        assert!(csv.contains("dataset,x,y\nBrand 2,1,0\n"));
    }
}
