use crate::{Model, Todo};
use std::fmt::Write;

pub fn view(model: &Model) -> String {
    let mut out = String::new();

    if model.total_count() == 0 {
        out.push_str("No todos yet! Add your first todo to get started.\n");
        return out;
    }

    for todo in model.todos() {
        view_todo(&mut out, todo);
    }
    out.push('\n');
    view_progress(&mut out, model);

    out
}

fn view_todo(out: &mut String, todo: &Todo) {
    let _ = writeln!(
        out,
        "[{}] {:>4}  {}  (created {})",
        if todo.completed { "x" } else { " " },
        todo.id,
        todo.description,
        todo.created_at.format("%Y-%m-%d"),
    );
}

fn view_progress(out: &mut String, model: &Model) {
    let completed = model.completed_count();
    let total = model.total_count();
    let badge = match model.progress_percent() {
        Some(_) if completed == total => "All done!".to_owned(),
        Some(percent) => format!("{}%", percent),
        None => String::new(),
    };
    let _ = writeln!(out, "Progress: {} of {} completed  {}", completed, total, badge);
}
