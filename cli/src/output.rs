//! Terminal rendering of tasks and statistics

use std::io;

use todo_core::{Task, TaskStats};

#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cols: impl IntoIterator<Item = impl Into<String>>) {
        self.rows.push(cols.into_iter().map(Into::into).collect());
    }

    pub fn write_to(&self, mut out: impl io::Write) -> io::Result<()> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| visible_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i >= widths.len() {
                    widths.push(0);
                }
                widths[i] = widths[i].max(visible_width(cell));
            }
        }

        writeln!(out, "{}", format_row(&self.headers, &widths))?;
        for row in &self.rows {
            writeln!(out, "{}", format_row(row, &widths))?;
        }
        Ok(())
    }
}

fn visible_width(s: &str) -> usize {
    s.chars().count()
}

fn format_row(row: &[String], widths: &[usize]) -> String {
    let mut out = String::new();
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        // No trailing padding on the last column
        if i + 1 < row.len() {
            let w = widths.get(i).copied().unwrap_or(0);
            out.push_str(&" ".repeat(w.saturating_sub(visible_width(cell))));
        }
    }
    out
}

/// First eight characters of a task id
pub fn short_id(task: &Task) -> String {
    task.id.to_string().chars().take(8).collect()
}

pub fn task_table<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Table {
    let mut table = Table::new(["ID", "DONE", "TITLE", "PRIORITY", "CATEGORY", "DUE"]);
    for task in tasks {
        table.row([
            short_id(task),
            if task.completed { "[x]" } else { "[ ]" }.to_string(),
            task.title.clone(),
            task.priority.label().to_string(),
            task.category.label().to_string(),
            task.due_label().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

pub fn stats_table(stats: &TaskStats) -> Table {
    let mut table = Table::new(["STAT", "VALUE"]);
    table.row(["Total Tasks".to_string(), stats.total.to_string()]);
    table.row(["Active".to_string(), stats.active.to_string()]);
    table.row(["Completed".to_string(), stats.completed.to_string()]);
    table.row([
        "High Priority".to_string(),
        stats.high_priority_active.to_string(),
    ]);
    table.row(["Completion".to_string(), format!("{}%", stats.completion_rate)]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::{Priority, TaskSubmission};

    fn render(table: &Table) -> String {
        let mut buf = Vec::new();
        table.write_to(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_columns_are_aligned() {
        let mut table = Table::new(["A", "B"]);
        table.row(["long cell", "x"]);
        assert_eq!(render(&table), "A          B\nlong cell  x\n");
    }

    #[test]
    fn test_task_table_row() {
        let mut task = Task::new(
            TaskSubmission::new("Buy milk")
                .with_priority(Priority::High)
                .with_due_date("2024-03-07")
                .validate()
                .unwrap(),
        );
        task.toggle();

        let out = render(&task_table([&task]));
        let row = out.lines().nth(1).unwrap();
        assert!(row.starts_with(&short_id(&task)));
        assert!(row.contains("[x]"));
        assert!(row.contains("High"));
        assert!(row.contains("Personal"));
        assert!(row.ends_with("Mar 07"));
    }

    #[test]
    fn test_stats_table() {
        let out = render(&stats_table(&TaskStats {
            total: 4,
            completed: 1,
            active: 3,
            high_priority_active: 2,
            completion_rate: 25,
        }));
        let value = |label: &str| {
            out.lines()
                .find(|line| line.starts_with(label))
                .and_then(|line| line.split_whitespace().last())
                .map(str::to_string)
        };
        assert_eq!(value("Completion").as_deref(), Some("25%"));
        assert_eq!(value("Total Tasks").as_deref(), Some("4"));
        assert_eq!(value("High Priority").as_deref(), Some("2"));
    }
}
