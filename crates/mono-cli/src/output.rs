use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print rows under a header, columns padded to the widest cell. The last
/// column is not padded.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    for line in render_table(headers, &rows) {
        println!("{line}");
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let render_row = |cells: Vec<&str>| -> String {
        let last = cells.len().saturating_sub(1);
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == last {
                    cell.to_string()
                } else {
                    let w = widths.get(i).copied().unwrap_or(0);
                    format!("{:width$}", cell, width = w)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(headers.to_vec()));
    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    lines.push(sep.join("  "));
    for row in rows {
        lines.push(render_row(row.iter().map(String::as_str).collect()));
    }
    lines
}
