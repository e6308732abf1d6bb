use regex::Regex;

use std::sync::OnceLock;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub(super) fn $name() -> &'static Regex {
            static CELL: OnceLock<Regex> = OnceLock::new();
            CELL.get_or_init(|| Regex::new($re).expect("classifier pattern is a valid regex"))
        }
    };
}

pattern!(
    rate_limit,
    r"quota|rate[ _-]?limit|resource[ _]?exhausted|too many requests"
);

pattern!(credential, r"api[ _-]?key|credential");

pattern!(
    auth_invalid,
    r"invalid|not valid|expired|revoked|rejected|malformed|incorrect"
);

pattern!(
    auth_missing,
    r"missing|not (configured|set|provided|found)|no api[ _-]?key|required|select (an|your) api"
);

pattern!(
    auth_rejected,
    r"permission[ _]denied|unauthenticated|unauthori[sz]ed"
);

pattern!(
    network,
    r"network|connection (refused|reset|closed|aborted)|failed to (connect|fetch)|fetch failed|dns|unreachable|timed out|error sending request|service unavailable"
);
