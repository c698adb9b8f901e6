use rand::Rng;

/// Number of seeds picked when sampling at random.
pub const RANDOM_SEED_COUNT: usize = 5;

/// How seed tracks are chosen from the seed playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedMode {
    /// Every track, in playlist order.
    All,
    /// Positions typed by the user; `None` when nothing was read.
    Interactive(Option<String>),
    /// A uniform sample of up to [`RANDOM_SEED_COUNT`] tracks.
    Random,
}

/// Result of parsing interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Indices(Vec<usize>),
    Invalid,
}

/// Parses space separated 1-based positions into 0-based indices.
///
/// Missing or blank input, a non-numeric token or a position outside
/// `1..=len` makes the whole selection invalid. Repeated positions are
/// kept once, in the order first given.
pub fn parse_selection(input: Option<&str>, len: usize) -> Selection {
    let Some(input) = input else {
        return Selection::Invalid;
    };

    let mut indices: Vec<usize> = Vec::new();
    for token in input.split_whitespace() {
        match token.parse::<usize>() {
            Ok(position) if (1..=len).contains(&position) => {
                if !indices.contains(&(position - 1)) {
                    indices.push(position - 1);
                }
            }
            _ => return Selection::Invalid,
        }
    }

    if indices.is_empty() {
        Selection::Invalid
    } else {
        Selection::Indices(indices)
    }
}

/// Samples `min(RANDOM_SEED_COUNT, len)` distinct indices, returned in
/// ascending order.
pub fn random_indices<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let amount = len.min(RANDOM_SEED_COUNT);
    let mut indices = rand::seq::index::sample(rng, len, amount).into_vec();
    indices.sort_unstable();
    indices
}

/// Picks seed indices for a playlist of `len` tracks.
///
/// Never empty when `len > 0`; invalid interactive input falls back to a
/// random sample.
pub fn select_seeds<R: Rng + ?Sized>(len: usize, mode: &SeedMode, rng: &mut R) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }

    match mode {
        SeedMode::All => (0..len).collect(),
        SeedMode::Random => random_indices(len, rng),
        SeedMode::Interactive(input) => match parse_selection(input.as_deref(), len) {
            Selection::Indices(indices) => indices,
            Selection::Invalid => random_indices(len, rng),
        },
    }
}
