use std::{collections::BTreeSet, fmt};

use log::{debug, trace, warn};
use rand::{
    rngs::OsRng,
    seq::{index, SliceRandom},
    CryptoRng, Rng, RngCore,
};
use serde::{Deserialize, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    charsets::{
        is_disallowed, Category, CodePointRange, ALL_UNICODE_RANGES, DINGBAT_RANGES,
        EMOJI_RANGES, FALLBACK_POOL, SYMBOL_RANGES,
    },
    error::{Error, Result},
};

/// Longest password a single call will produce.
pub const MAX_LENGTH: usize = 65_536;

/// How many code points are drawn for one position before giving up on the range table.
const MAX_RANGE_ATTEMPTS: usize = 50;

/// Everything that decides what a password is made of.
///
/// `GenerationConfig::new` starts with no category enabled, while `Default` matches what the
/// command line uses when given no options: 32 characters of latin letters, numbers and signs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub length: usize,
    pub categories: BTreeSet<Category>,
    pub include_all_unicode: bool,
    pub include_emoji: bool,
    pub include_symbols: bool,
    pub include_dingbats: bool,
    pub exclude_ranges: Vec<CodePointRange>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(32)
            .with_category(Category::Latin)
            .with_category(Category::Numbers)
            .with_category(Category::Signs)
    }
}

impl GenerationConfig {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            categories: BTreeSet::new(),
            include_all_unicode: false,
            include_emoji: false,
            include_symbols: false,
            include_dingbats: false,
            exclude_ranges: vec![],
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category);
        self
    }

    pub fn with_categories<I: IntoIterator<Item = Category>>(mut self, categories: I) -> Self {
        self.categories.extend(categories);
        self
    }

    pub fn include_all_unicode(mut self, include: bool) -> Self {
        self.include_all_unicode = include;
        self
    }

    pub fn include_emoji(mut self, include: bool) -> Self {
        self.include_emoji = include;
        self
    }

    pub fn include_symbols(mut self, include: bool) -> Self {
        self.include_symbols = include;
        self
    }

    pub fn include_dingbats(mut self, include: bool) -> Self {
        self.include_dingbats = include;
        self
    }

    pub fn exclude(mut self, range: CodePointRange) -> Self {
        self.exclude_ranges.push(range);
        self
    }
}

/// Estimated number of distinct passwords a config can produce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Combinations {
    Estimate(f64),
    /// Too large to be meaningful, always the case for all-Unicode passwords.
    Unbounded,
}

impl Combinations {
    fn from_pool_size(size: usize, length: usize) -> Self {
        let estimate = (size as f64).powi(length as i32);
        if estimate.is_finite() {
            Self::Estimate(estimate)
        } else {
            Self::Unbounded
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

impl fmt::Display for Combinations {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Estimate(estimate) => write!(f, "{estimate:.3e}"),
            Self::Unbounded => write!(f, "Infinity"),
        }
    }
}

impl Serialize for Combinations {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Estimate(estimate) => serializer.serialize_f64(*estimate),
            Self::Unbounded => serializer.serialize_str("Infinity"),
        }
    }
}

/// A generated password. The text is wiped from memory when the result is dropped.
#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
pub struct PasswordResult {
    #[serde(rename = "Password")]
    password: String,
    #[serde(rename = "Combinations")]
    #[zeroize(skip)]
    combinations: Combinations,
}

impl PasswordResult {
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn combinations(&self) -> Combinations {
        self.combinations
    }

    /// Length of the password in Unicode code points.
    pub fn code_points(&self) -> usize {
        self.password.chars().count()
    }
}

impl fmt::Debug for PasswordResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PasswordResult")
            .field("password", &"<redacted>")
            .field("combinations", &self.combinations)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    AllUnicode,
    Mixed,
    Pool,
}

struct Requirement {
    members: Vec<char>,
    count: usize,
}

/// A validated config, with every pool and range resolved and filtered.
struct Plan {
    length: usize,
    mode: Mode,
    pool: Vec<char>,
    ranges: Vec<CodePointRange>,
    exclusions: Vec<CodePointRange>,
    fallback: Vec<char>,
    requirements: Vec<Requirement>,
}

impl Plan {
    fn new(config: &GenerationConfig) -> Result<Plan> {
        if config.length == 0 {
            return Err(Error::InvalidConfig(
                "password length must be at least 1".to_owned(),
            ));
        }
        if config.length > MAX_LENGTH {
            return Err(Error::InvalidConfig(format!(
                "password length must be at most {MAX_LENGTH}"
            )));
        }

        let exclusions: Vec<CodePointRange> = config
            .exclude_ranges
            .iter()
            .filter(|range| {
                if range.is_inverted() {
                    warn!("dropping inverted exclusion range {range}");
                }
                !range.is_inverted()
            })
            .copied()
            .collect();
        let allowed = |ch: &char| !exclusions.iter().any(|r| r.contains(*ch as u32));

        let mut pool = vec![];
        for category in &config.categories {
            for _ in 0..category.weight() {
                pool.extend(category.letters().chars().filter(allowed));
            }
        }

        let mut ranges = vec![];
        if config.include_emoji {
            ranges.extend_from_slice(EMOJI_RANGES);
        }
        if config.include_symbols {
            ranges.extend_from_slice(SYMBOL_RANGES);
        }
        if config.include_dingbats {
            ranges.extend_from_slice(DINGBAT_RANGES);
        }

        let fallback: Vec<char> = FALLBACK_POOL.chars().filter(allowed).collect();

        let mode = if config.include_all_unicode {
            ranges = ALL_UNICODE_RANGES.to_vec();
            Mode::AllUnicode
        } else if !ranges.is_empty() {
            Mode::Mixed
        } else {
            Mode::Pool
        };

        if mode == Mode::Pool && pool.is_empty() {
            debug!("no character category enabled, using the fallback pool");
            pool.clone_from(&fallback);
        }

        let mut requirements = vec![];
        for category in &config.categories {
            for (class, count) in category.requirements() {
                let members: Vec<char> = class.members().chars().filter(allowed).collect();
                if members.is_empty() {
                    warn!("every {class:?} character is excluded, not enforcing it");
                    continue;
                }
                requirements.push(Requirement { members, count });
            }
        }

        let mut plan = Plan {
            length: config.length,
            mode,
            pool,
            ranges,
            exclusions,
            fallback,
            requirements,
        };

        if plan.fallback.is_empty() {
            let from_ranges: Vec<char> = plan
                .accepted_range_chars()
                .take(FALLBACK_POOL.len())
                .collect();
            if !from_ranges.is_empty() {
                debug!("fallback pool is excluded, using range code points instead");
            }
            plan.fallback = from_ranges;
        }
        if plan.pool.is_empty() && plan.fallback.is_empty() {
            return Err(Error::InvalidConfig(
                "every candidate character is excluded".to_owned(),
            ));
        }

        Ok(plan)
    }

    fn accepts(&self, cp: u32) -> bool {
        !is_disallowed(cp) && !self.exclusions.iter().any(|r| r.contains(cp))
    }

    /// Code points of the range table that survive the filter and the exclusions, in table order.
    fn accepted_range_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.ranges
            .iter()
            .flat_map(|range| range.start..=range.end)
            .filter(move |cp| self.accepts(*cp))
            .filter_map(char::from_u32)
    }

    fn run<R: Rng + CryptoRng>(&self, rng: &mut R) -> PasswordResult {
        debug!(
            "generating {} characters in {:?} mode, pool of {} and {} ranges",
            self.length,
            self.mode,
            self.pool.len(),
            self.ranges.len()
        );

        let mut chars: Vec<char> = Vec::with_capacity(self.length);
        for _ in 0..self.length {
            let ch = match self.mode {
                Mode::AllUnicode => self.sample_ranges(rng),
                Mode::Mixed if !self.pool.is_empty() && rng.gen_bool(0.5) => {
                    self.pool[rng.gen_range(0..self.pool.len())]
                }
                Mode::Mixed => self.sample_ranges(rng),
                Mode::Pool => self.sample_pool(chars.last().copied(), rng),
            };
            chars.push(ch);
        }

        self.enforce_requirements(&mut chars, rng);
        chars.shuffle(rng);

        let password: String = chars.iter().collect();
        chars.zeroize();

        PasswordResult {
            password,
            combinations: self.combinations(),
        }
    }

    /// Uniform draw from the pool. A draw repeating the previous character, ignoring case, is
    /// redrawn once.
    fn sample_pool<R: Rng + CryptoRng>(&self, last: Option<char>, rng: &mut R) -> char {
        let mut ch = self.pool[rng.gen_range(0..self.pool.len())];
        if let Some(last) = last {
            if repeats(last, ch) {
                ch = self.pool[rng.gen_range(0..self.pool.len())];
            }
        }
        ch
    }

    fn sample_ranges<R: Rng + CryptoRng>(&self, rng: &mut R) -> char {
        for _ in 0..MAX_RANGE_ATTEMPTS {
            let range = self.ranges[rng.gen_range(0..self.ranges.len())];
            let cp = rng.gen_range(range.start..=range.end);
            if self.accepts(cp) {
                if let Some(ch) = char::from_u32(cp) {
                    return ch;
                }
            }
        }

        trace!("range sampling exhausted after {MAX_RANGE_ATTEMPTS} attempts");
        let source = if self.fallback.is_empty() {
            &self.pool
        } else {
            &self.fallback
        };
        source[rng.gen_range(0..source.len())]
    }

    /// Overwrites distinct random positions with characters of every required class. When the
    /// requirements add up to more than the length, the later ones are cut.
    fn enforce_requirements<R: Rng + CryptoRng>(&self, chars: &mut [char], rng: &mut R) {
        let mut replacements: Vec<char> = vec![];
        for requirement in &self.requirements {
            for _ in 0..requirement.count {
                let members = &requirement.members;
                replacements.push(members[rng.gen_range(0..members.len())]);
            }
        }
        replacements.truncate(chars.len());

        let positions = index::sample(rng, chars.len(), replacements.len());
        for (position, ch) in positions.into_iter().zip(replacements.iter()) {
            chars[position] = *ch;
        }
        replacements.zeroize();
    }

    /// Distinct pool characters, plus every code point the range table can yield in mixed mode,
    /// raised to the password length. A range table with nothing left in it yields fallback
    /// characters instead.
    fn combinations(&self) -> Combinations {
        let mut distinct: BTreeSet<char> = self.pool.iter().copied().collect();
        match self.mode {
            Mode::AllUnicode => Combinations::Unbounded,
            Mode::Pool => Combinations::from_pool_size(distinct.len(), self.length),
            Mode::Mixed => {
                let from_ranges: BTreeSet<char> = self.accepted_range_chars().collect();
                if from_ranges.is_empty() {
                    let source = if self.fallback.is_empty() {
                        &self.pool
                    } else {
                        &self.fallback
                    };
                    distinct.extend(source.iter().copied());
                }
                Combinations::from_pool_size(distinct.len() + from_ranges.len(), self.length)
            }
        }
    }
}

fn repeats(last: char, ch: char) -> bool {
    last == ch || last.to_lowercase().eq(ch.to_lowercase())
}

/// Generates a password using the operating system's random source.
///
/// The config is validated before any randomness is consumed. Fails with
/// `Error::NoSecureRandomSource` when the OS generator can't be read.
pub fn generate(config: &GenerationConfig) -> Result<PasswordResult> {
    let plan = Plan::new(config)?;

    let mut rng = OsRng;
    let mut probe = [0u8; 16];
    rng.try_fill_bytes(&mut probe)?;

    Ok(plan.run(&mut rng))
}

/// Generates a password with the supplied random source.
pub fn generate_with_rng<R: Rng + CryptoRng>(
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<PasswordResult> {
    Ok(Plan::new(config)?.run(rng))
}

#[cfg(test)]
#[path = "tests/password_generator.rs"]
mod password_generator_tests;
