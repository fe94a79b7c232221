/// Tags every issued lookup with a monotonically increasing token. Only the
/// reply carrying the newest token may be applied; anything older was
/// superseded while in flight and is ignored on arrival.
#[derive(Debug, Default)]
pub(crate) struct QueryRaceGuard {
    latest: u64,
    awaiting: bool,
}

impl QueryRaceGuard {
    /// Start a new query and return its token.
    pub(crate) fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.awaiting = true;
        self.latest
    }

    pub(crate) fn is_current(&self, token: u64) -> bool {
        token == self.latest
    }

    /// Supersede the outstanding query without issuing a new one; its reply
    /// is ignored on arrival.
    pub(crate) fn invalidate(&mut self) {
        self.latest += 1;
        self.awaiting = false;
    }

    /// Accept the reply for `token`. Returns `false` for superseded tokens,
    /// which leave the newest query outstanding.
    pub(crate) fn finish(&mut self, token: u64) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.awaiting = false;
        true
    }

    /// Whether the newest query has not replied yet.
    pub(crate) fn is_awaiting(&self) -> bool {
        self.awaiting
    }
}
