use std::fmt::Write;

use popcorn_core::{AppViewModel, DetailResult, DetailView, MAX_RATING};

/// Renders the whole screen as plain text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Popcorn | search: {:?}", view.query);
    let _ = writeln!(out, "Found {} results", view.result_count());
    render_results(&mut out, view);
    out.push('\n');
    match &view.details {
        Some(details) => render_details(&mut out, details),
        None => render_watched(&mut out, view),
    }
    out
}

fn render_results(out: &mut String, view: &AppViewModel) {
    if let Some(error) = &view.error {
        let _ = writeln!(out, "  {error}");
        return;
    }
    if view.is_loading {
        let _ = writeln!(out, "  Loading...");
        return;
    }
    for (index, movie) in view.movies.iter().enumerate() {
        let marker = if view.selected_id.as_deref() == Some(movie.id.as_str()) {
            '>'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{marker} {:>2}. {} ({})",
            index + 1,
            movie.title,
            movie.year
        );
    }
}

fn render_details(out: &mut String, view: &DetailView) {
    let detail = match &view.details {
        DetailResult::Idle | DetailResult::Loading => {
            let _ = writeln!(out, "Loading details...");
            return;
        }
        DetailResult::Failed(reason) => {
            let _ = writeln!(out, "Could not load details: {reason}");
            return;
        }
        DetailResult::Loaded(detail) => detail,
    };

    let _ = writeln!(out, "{} ({})", detail.title, detail.year);
    let _ = writeln!(out, "{} | {}", detail.released, detail.runtime);
    let _ = writeln!(out, "{}", detail.genre);
    let _ = writeln!(out, "IMDb rating: {}", detail.imdb_rating);
    match view.watched_rating {
        Some(rating) => {
            let _ = writeln!(out, "Already watched and rated with {rating}");
        }
        None => {
            let _ = writeln!(out, "Your rating: {}", stars(view.user_rating));
            if view.can_add {
                let _ = writeln!(out, "  :add to add it to your list");
            }
        }
    }
    let _ = writeln!(out, "{}", detail.plot);
    let _ = writeln!(out, "Starring {}", detail.actors);
    let _ = writeln!(out, "Directed by {}", detail.director);
}

fn render_watched(out: &mut String, view: &AppViewModel) {
    let summary = &view.summary;
    let _ = writeln!(out, "Movies you watched");
    let _ = writeln!(
        out,
        "  {} movies | imdb {:.2} | yours {:.2} | {:.1} min",
        summary.count, summary.avg_imdb_rating, summary.avg_user_rating, summary.avg_runtime
    );
    for (index, movie) in view.watched.iter().enumerate() {
        let imdb = movie.imdb_rating.unwrap_or(0.0);
        let runtime = movie.runtime_minutes.unwrap_or(0);
        let _ = writeln!(
            out,
            "  {:>2}. {} | imdb {} | yours {} | {} min",
            index + 1,
            movie.title,
            imdb,
            movie.user_rating,
            runtime
        );
    }
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(MAX_RATING));
    let empty = usize::from(MAX_RATING) - filled;
    format!("{}{} ({rating})", "*".repeat(filled), ".".repeat(empty))
}
