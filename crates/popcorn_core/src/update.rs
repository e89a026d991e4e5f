use crate::{AppState, Effect, Msg, Selection, WatchedMovie};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(text) => apply_query(&mut state, text),
        Msg::QueryCleared => apply_query(&mut state, String::new()),
        Msg::SearchSettled { token, outcome } => {
            // Stale tokens are dropped without touching state.
            if state.search.on_settled(token, outcome) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::MovieSelected { id } => {
            let toggled_off = state
                .selection
                .as_ref()
                .is_some_and(|selection| selection.id() == id);
            let mut effects: Vec<Effect> = state.close_selection().into_iter().collect();
            if !toggled_off {
                let (selection, fetch) = Selection::open(id, &mut state.tokens);
                state.selection = Some(selection);
                effects.push(fetch);
            }
            effects
        }
        Msg::SelectionClosed => {
            if state.selection.is_none() {
                return (state, Vec::new());
            }
            state.close_selection().into_iter().collect()
        }
        Msg::DetailsSettled { token, outcome } => {
            let applied = state
                .selection
                .as_mut()
                .is_some_and(|selection| selection.on_settled(token, outcome));
            if applied {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RatingChosen(rating) => {
            let already_watched = state
                .selection
                .as_ref()
                .is_some_and(|selection| state.watched_rating(selection.id()).is_some());
            let changed = !already_watched
                && state
                    .selection
                    .as_mut()
                    .is_some_and(|selection| selection.choose_rating(rating));
            if changed {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AddToWatched => add_to_watched(&mut state),
        Msg::WatchedRemoved { id } => {
            let before = state.watched.len();
            state.watched.retain(|movie| movie.id != id);
            if state.watched.len() == before {
                Vec::new()
            } else {
                state.mark_dirty();
                vec![Effect::PersistWatched(state.watched.clone())]
            }
        }
        Msg::RestoreWatched(movies) => {
            state.watched = movies;
            state.mark_dirty();
            Vec::new()
        }
    };

    (state, effects)
}

fn apply_query(state: &mut AppState, text: String) -> Vec<Effect> {
    let event = state.query.set_query(text);
    let AppState {
        search,
        tokens,
        selection,
        ..
    } = state;

    let mut closed = None;
    let mut effects = search.on_query(&event.query, tokens, || {
        closed = selection.take().and_then(Selection::close);
    });
    effects.extend(closed);
    state.mark_dirty();
    effects
}

fn add_to_watched(state: &mut AppState) -> Vec<Effect> {
    let Some(selection) = state.selection.as_ref() else {
        return Vec::new();
    };
    if selection.user_rating() == 0 || state.watched_rating(selection.id()).is_some() {
        return Vec::new();
    }
    let Some(detail) = selection.details().detail() else {
        return Vec::new();
    };

    let mut movie =
        WatchedMovie::from_detail(detail, selection.user_rating(), selection.rating_decisions());
    movie.id = selection.id().to_string();
    state.watched.push(movie);

    let mut effects: Vec<Effect> = state.close_selection().into_iter().collect();
    effects.push(Effect::PersistWatched(state.watched.clone()));
    effects
}
