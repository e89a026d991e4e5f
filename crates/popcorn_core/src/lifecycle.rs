use crate::Effect;

/// Handle identifying one outbound request.
///
/// Tokens are minted by [`TokenMint`] and are unique for the lifetime of an
/// [`crate::AppState`], so the engine can key cancellation on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Raw value used by the IO layer to correlate requests and responses.
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Rebuilds a token from a value previously obtained with [`RequestToken::raw`].
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Monotonic source of request tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenMint {
    last: u64,
}

impl TokenMint {
    pub fn mint(&mut self) -> RequestToken {
        self.last += 1;
        RequestToken(self.last)
    }
}

/// Holds at most one live token.
///
/// A token stays live from [`TokenSlot::issue`] until it is settled or
/// invalidated; anything else presented to [`TokenSlot::settle`] is stale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenSlot {
    live: Option<RequestToken>,
}

impl TokenSlot {
    pub fn live(&self) -> Option<RequestToken> {
        self.live
    }

    /// Drops the live token, returning the cancel effect for its request.
    pub fn invalidate(&mut self) -> Option<Effect> {
        self.live
            .take()
            .map(|token| Effect::CancelRequest { token })
    }

    /// Mints a new live token. Callers invalidate the previous one first.
    pub fn issue(&mut self, mint: &mut TokenMint) -> RequestToken {
        debug_assert!(self.live.is_none(), "issuing over a live token");
        let token = mint.mint();
        self.live = Some(token);
        token
    }

    /// Returns `true` and retires the token if it is the live one.
    pub fn settle(&mut self, token: RequestToken) -> bool {
        if self.live == Some(token) {
            self.live = None;
            true
        } else {
            false
        }
    }
}
