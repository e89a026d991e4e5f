use std::sync::Once;

use pretty_assertions::assert_eq;
use popcorn_core::{
    update, AppState, Effect, MovieSummary, Msg, QueryController, RequestToken, SearchLifecycle,
    SearchOutcome, SearchResult, TokenMint, NOT_FOUND_MESSAGE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(popcorn_logging::initialize_for_tests);
}

fn batman() -> MovieSummary {
    MovieSummary {
        id: "tt0372784".to_string(),
        title: "Batman Begins".to_string(),
        year: "2005".to_string(),
        poster: "https://example.com/batman.jpg".to_string(),
    }
}

fn cat_people() -> MovieSummary {
    MovieSummary {
        id: "tt0083722".to_string(),
        title: "Cat People".to_string(),
        year: "1982".to_string(),
        poster: "N/A".to_string(),
    }
}

fn type_query(state: AppState, text: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::QueryChanged(text.to_string()))
}

fn issued_token(effects: &[Effect]) -> RequestToken {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SearchMovies { token, .. } => Some(*token),
            _ => None,
        })
        .expect("search effect")
}

fn search_count(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::SearchMovies { .. }))
        .count()
}

#[test]
fn short_query_stays_idle_without_request() {
    init_logging();
    let (state, effects) = type_query(AppState::new(), "ab");

    assert_eq!(state.search_result(), &SearchResult::Idle);
    assert!(effects.is_empty());
    assert_eq!(state.query(), "ab");
}

#[test]
fn gate_counts_characters_not_bytes() {
    init_logging();
    // Two characters, four bytes.
    let (state, effects) = type_query(AppState::new(), "éé");
    assert_eq!(state.search_result(), &SearchResult::Idle);
    assert!(effects.is_empty());

    let (state, effects) = type_query(state, "Amé");
    assert_eq!(state.search_result(), &SearchResult::Loading);
    assert_eq!(search_count(&effects), 1);
}

#[test]
fn matching_response_becomes_success() {
    init_logging();
    let (state, effects) = type_query(AppState::new(), "bat");
    assert_eq!(state.search_result(), &SearchResult::Loading);
    assert_eq!(
        effects,
        vec![Effect::SearchMovies {
            token: issued_token(&effects),
            query: "bat".to_string(),
        }]
    );

    let (mut state, effects) = update(
        state,
        Msg::SearchSettled {
            token: issued_token(&effects),
            outcome: SearchOutcome::Found(vec![batman()]),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.search_result(), &SearchResult::Success(vec![batman()]));
    assert_eq!(state.view().result_count(), 1);
    assert!(state.consume_dirty());
}

#[test]
fn no_match_becomes_not_found_message() {
    init_logging();
    let (state, effects) = type_query(AppState::new(), "zzzznomatch");
    let (state, _) = update(
        state,
        Msg::SearchSettled {
            token: issued_token(&effects),
            outcome: SearchOutcome::NotFound,
        },
    );

    assert_eq!(state.search_result(), &SearchResult::NotFound);
    let view = state.view();
    assert_eq!(view.error.as_deref(), Some(NOT_FOUND_MESSAGE));
    assert!(view.movies.is_empty());
}

#[test]
fn transport_failure_is_surfaced_verbatim() {
    init_logging();
    let (state, effects) = type_query(AppState::new(), "bat");
    let (state, _) = update(
        state,
        Msg::SearchSettled {
            token: issued_token(&effects),
            outcome: SearchOutcome::Failed("error sending request".to_string()),
        },
    );

    assert_eq!(
        state.search_result(),
        &SearchResult::Failed("error sending request".to_string())
    );
    assert_eq!(state.view().error.as_deref(), Some("error sending request"));
}

#[test]
fn superseded_response_is_discarded() {
    init_logging();
    let (state, bat_effects) = type_query(AppState::new(), "bat");
    let bat = issued_token(&bat_effects);

    let (state, cat_effects) = type_query(state, "cat");
    let cat = issued_token(&cat_effects);
    assert_eq!(
        cat_effects,
        vec![
            Effect::CancelRequest { token: bat },
            Effect::SearchMovies {
                token: cat,
                query: "cat".to_string(),
            },
        ]
    );

    let (mut state, _) = update(
        state,
        Msg::SearchSettled {
            token: cat,
            outcome: SearchOutcome::Found(vec![cat_people()]),
        },
    );
    assert!(state.consume_dirty());

    // The bat response arrives late.
    let (mut state, effects) = update(
        state,
        Msg::SearchSettled {
            token: bat,
            outcome: SearchOutcome::Found(vec![batman()]),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(
        state.search_result(),
        &SearchResult::Success(vec![cat_people()])
    );
}

#[test]
fn stale_response_does_not_disturb_pending_query() {
    init_logging();
    let mut state = AppState::new();
    let mut tokens = Vec::new();
    for text in ["bat", "batm", "batma", "batman"] {
        let (next, effects) = type_query(state, text);
        tokens.push(issued_token(&effects));
        state = next;
    }
    let (latest, older) = tokens.split_last().expect("tokens");

    for token in older {
        let (next, _) = update(
            state,
            Msg::SearchSettled {
                token: *token,
                outcome: SearchOutcome::Failed("aborted".to_string()),
            },
        );
        state = next;
        assert_eq!(state.search_result(), &SearchResult::Loading);
    }

    let (state, _) = update(
        state,
        Msg::SearchSettled {
            token: *latest,
            outcome: SearchOutcome::Found(vec![batman()]),
        },
    );
    assert_eq!(state.search_result(), &SearchResult::Success(vec![batman()]));
}

#[test]
fn short_query_invalidates_pending_request() {
    init_logging();
    let (state, effects) = type_query(AppState::new(), "bat");
    let bat = issued_token(&effects);

    let (state, effects) = type_query(state, "ba");
    assert_eq!(effects, vec![Effect::CancelRequest { token: bat }]);
    assert_eq!(state.search_result(), &SearchResult::Idle);

    let (state, _) = update(
        state,
        Msg::SearchSettled {
            token: bat,
            outcome: SearchOutcome::Found(vec![batman()]),
        },
    );
    assert_eq!(state.search_result(), &SearchResult::Idle);
}

#[test]
fn repeating_a_query_settles_the_same_way() {
    init_logging();
    let (once, effects) = type_query(AppState::new(), "bat");
    let (once, _) = update(
        once,
        Msg::SearchSettled {
            token: issued_token(&effects),
            outcome: SearchOutcome::Found(vec![batman()]),
        },
    );

    let (twice, first) = type_query(AppState::new(), "bat");
    let (twice, second) = type_query(twice, "bat");
    assert_eq!(twice.search_result(), &SearchResult::Loading);
    assert_ne!(issued_token(&first), issued_token(&second));
    let (twice, _) = update(
        twice,
        Msg::SearchSettled {
            token: issued_token(&second),
            outcome: SearchOutcome::Found(vec![batman()]),
        },
    );

    assert_eq!(once.search_result(), twice.search_result());
}

#[test]
fn clearing_the_query_returns_to_idle() {
    init_logging();
    let (state, effects) = type_query(AppState::new(), "bat");
    let (state, cleared) = update(state, Msg::QueryCleared);

    assert_eq!(state.query(), "");
    assert_eq!(state.search_result(), &SearchResult::Idle);
    assert_eq!(
        cleared,
        vec![Effect::CancelRequest {
            token: issued_token(&effects)
        }]
    );
}

#[test]
fn lifecycle_closes_selection_once_per_loading_query() {
    let mut lifecycle = SearchLifecycle::new();
    let mut mint = TokenMint::default();
    let mut closes = 0;

    lifecycle.on_query("ab", &mut mint, || closes += 1);
    assert_eq!(closes, 0);

    let effects = lifecycle.on_query("abc", &mut mint, || closes += 1);
    assert_eq!(closes, 1);
    let token = issued_token(&effects);

    assert!(lifecycle.on_settled(token, SearchOutcome::NotFound));
    // A second settle for the same token is stale.
    assert!(!lifecycle.on_settled(token, SearchOutcome::Found(vec![batman()])));
    assert_eq!(closes, 1);
    assert_eq!(lifecycle.result(), &SearchResult::NotFound);
    assert_eq!(lifecycle.live_token(), None);
}

#[test]
fn settled_query_is_not_cancelled_later() {
    let mut lifecycle = SearchLifecycle::new();
    let mut mint = TokenMint::default();

    let effects = lifecycle.on_query("bat", &mut mint, || {});
    lifecycle.on_settled(issued_token(&effects), SearchOutcome::Found(Vec::new()));

    let effects = lifecycle.on_query("cat", &mut mint, || {});
    assert_eq!(search_count(&effects), 1);
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::CancelRequest { .. })));
}

#[test]
fn query_controller_publishes_every_set() {
    let mut controller = QueryController::new();
    let first = controller.set_query("bat");
    let second = controller.set_query("bat");

    assert_eq!(first.query, second.query);
    assert!(second.revision > first.revision);
    assert_eq!(controller.query(), "bat");
    assert_eq!(controller.revision(), second.revision);

    let spaced = controller.set_query("  Bat ");
    assert_eq!(spaced.query, "  Bat ");
}
