//! Playlist builder.
//!
//! A genome is an ordered list of distinct catalog indices. Ten objectives
//! trade off total play time against a target, musical coherence (genre
//! and key entropy, tempo jumps, loudness and dissonance spread) and
//! popularity (interest, listens, favorites).
//!
//! # Catalog preparation
//!
//! Raw [`TrackRecord`]s may have missing fields. [`TrackCatalog::from_records`]
//! keeps only complete records that pass a [`CatalogFilter`].

use crate::error::{EvaluationFailure, MoeaError, Result};
use crate::moea::operators::{insert_at_random, one_point_crossover, remove_at_random};
use crate::moea::{FitnessVector, MoeaProblem, Objective, ObjectiveSpec};
use log::warn;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A catalog track with every feature the objectives need.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    /// Catalog identifier, e.g. a file path.
    pub id: String,
    /// Play time in minutes.
    pub duration_minutes: f64,
    /// Genre labels. A track may carry several.
    pub genres: Vec<String>,
    /// Musical key, e.g. `"A minor"`.
    pub tonal_key: String,
    /// Tempo in beats per minute.
    pub bpm: f64,
    /// Mean loudness of beats.
    pub beats_loudness: f64,
    /// Integrated loudness.
    pub loudness: f64,
    /// Mean dissonance.
    pub dissonance: f64,
    /// Interest score from the listening service.
    pub interest: f64,
    /// Play count.
    pub listens: f64,
    /// Number of users who marked the track as a favorite.
    pub favorites: f64,
}

/// A raw catalog record as produced by feature extraction.
///
/// Extraction may fail partway, so every feature is optional.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackRecord {
    /// Catalog identifier.
    pub id: String,
    /// Duration as `"ss"`, `"mm:ss"` or `"hh:mm:ss"`.
    pub duration: Option<String>,
    /// See [`Track::genres`].
    pub genres: Option<Vec<String>>,
    /// See [`Track::tonal_key`].
    pub tonal_key: Option<String>,
    /// See [`Track::bpm`].
    pub bpm: Option<f64>,
    /// See [`Track::beats_loudness`].
    pub beats_loudness: Option<f64>,
    /// See [`Track::loudness`].
    pub loudness: Option<f64>,
    /// See [`Track::dissonance`].
    pub dissonance: Option<f64>,
    /// See [`Track::interest`].
    pub interest: Option<f64>,
    /// See [`Track::listens`].
    pub listens: Option<f64>,
    /// See [`Track::favorites`].
    pub favorites: Option<f64>,
}

impl TrackRecord {
    /// Converts to a [`Track`].
    ///
    /// # Errors
    /// [`MoeaError::InvalidRecord`] if a feature is missing or the duration
    /// cannot be parsed.
    pub fn to_track(&self) -> Result<Track> {
        let missing = |feature: &str| MoeaError::InvalidRecord {
            item: self.id.clone(),
            reason: format!("missing feature `{feature}`"),
        };

        let raw_duration = self.duration.as_deref().ok_or_else(|| missing("duration"))?;
        let duration_minutes =
            parse_duration_minutes(raw_duration).ok_or_else(|| MoeaError::InvalidRecord {
                item: self.id.clone(),
                reason: format!("unparseable duration {raw_duration:?}"),
            })?;

        Ok(Track {
            id: self.id.clone(),
            duration_minutes,
            genres: self.genres.clone().ok_or_else(|| missing("genres"))?,
            tonal_key: self.tonal_key.clone().ok_or_else(|| missing("tonal_key"))?,
            bpm: self.bpm.ok_or_else(|| missing("bpm"))?,
            beats_loudness: self.beats_loudness.ok_or_else(|| missing("beats_loudness"))?,
            loudness: self.loudness.ok_or_else(|| missing("loudness"))?,
            dissonance: self.dissonance.ok_or_else(|| missing("dissonance"))?,
            interest: self.interest.ok_or_else(|| missing("interest"))?,
            listens: self.listens.ok_or_else(|| missing("listens"))?,
            favorites: self.favorites.ok_or_else(|| missing("favorites"))?,
        })
    }
}

/// Parses `"ss"`, `"mm:ss"` or `"hh:mm:ss"` into minutes.
///
/// Returns `None` for any other shape, for non-numeric parts and for
/// negative or non-finite results.
///
/// ```
/// use u_moea::problems::playlist::parse_duration_minutes;
///
/// assert_eq!(parse_duration_minutes("03:30"), Some(3.5));
/// assert_eq!(parse_duration_minutes("1:00:00"), Some(60.0));
/// assert_eq!(parse_duration_minutes("90"), Some(1.5));
/// assert_eq!(parse_duration_minutes("1:2:3:4"), None);
/// ```
pub fn parse_duration_minutes(raw: &str) -> Option<f64> {
    let parts = raw
        .trim()
        .split(':')
        .map(|p| p.trim().parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    let (hours, mins, secs) = match parts.as_slice() {
        [secs] => (0.0, 0.0, *secs),
        [mins, secs] => (0.0, *mins, *secs),
        [hours, mins, secs] => (*hours, *mins, *secs),
        _ => return None,
    };

    let minutes = hours * 60.0 + mins + secs / 60.0;
    (minutes.is_finite() && minutes >= 0.0).then_some(minutes)
}

/// Which tracks are admitted to a catalog.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogFilter {
    /// Shortest admitted track, inclusive.
    pub min_minutes: f64,
    /// Longest admitted track, inclusive.
    pub max_minutes: f64,
    /// If set, only tracks carrying this genre are admitted.
    pub required_genre: Option<String>,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            min_minutes: 3.0,
            max_minutes: 10.0,
            required_genre: None,
        }
    }
}

impl CatalogFilter {
    /// Checks `track` against the filter.
    ///
    /// # Errors
    /// [`MoeaError::InvalidRecord`] naming the rule the track breaks.
    pub fn check(&self, track: &Track) -> Result<()> {
        let d = track.duration_minutes;
        if d < self.min_minutes || d > self.max_minutes {
            return Err(MoeaError::InvalidRecord {
                item: track.id.clone(),
                reason: format!(
                    "duration {d:.2} min outside [{}, {}]",
                    self.min_minutes, self.max_minutes
                ),
            });
        }
        if let Some(genre) = &self.required_genre {
            if !track.genres.iter().any(|g| g == genre) {
                return Err(MoeaError::InvalidRecord {
                    item: track.id.clone(),
                    reason: format!("lacks required genre `{genre}`"),
                });
            }
        }
        Ok(())
    }
}

/// Read-only set of tracks addressed by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackCatalog {
    tracks: Vec<Track>,
}

impl TrackCatalog {
    /// Wraps already prepared tracks.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Builds a catalog from raw records, dropping (and warn-logging) each
    /// record that is incomplete or rejected by `filter`.
    pub fn from_records<I>(records: I, filter: &CatalogFilter) -> Self
    where
        I: IntoIterator<Item = TrackRecord>,
    {
        let tracks = records
            .into_iter()
            .filter_map(|record| {
                match record.to_track().and_then(|t| filter.check(&t).map(|()| t)) {
                    Ok(track) => Some(track),
                    Err(err) => {
                        warn!("dropping track: {err}");
                        None
                    }
                }
            })
            .collect();
        Self { tracks }
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The track at `index`.
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All tracks in index order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

/// Shannon entropy `-Σ p·ln p` of a categorical attribute over items.
///
/// Each item yields its values; a value is counted at most once per item,
/// and `p = count / number of items`. Returns `0.0` for no items.
///
/// ```
/// use u_moea::problems::playlist::entropy;
///
/// let keys = [["A"], ["A"], ["B"], ["B"]];
/// let h = entropy(keys.iter().map(|k| k.iter().copied()));
/// assert!((h - 2.0f64.ln()).abs() < 1e-12);
/// ```
pub fn entropy<'a, I, V>(items: I) -> f64
where
    I: IntoIterator<Item = V>,
    V: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut n = 0usize;
    for item in items {
        n += 1;
        for value in item.into_iter().collect::<BTreeSet<_>>() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    if n == 0 {
        return 0.0;
    }
    counts
        .values()
        .map(|&c| c as f64 / n as f64)
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum()
}

fn spread(values: impl Iterator<Item = f64>) -> f64 {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        0.0
    } else {
        hi - lo
    }
}

/// Default target play time in minutes.
pub const DEFAULT_TARGET_MINUTES: f64 = 120.0;
/// Default number of tracks in an initial playlist.
pub const DEFAULT_INITIAL_LEN: usize = 20;
/// Default minimum number of tracks in a valid playlist.
pub const DEFAULT_MIN_LEN: usize = 3;

/// Playlist optimization over a [`TrackCatalog`].
///
/// # Objectives
///
/// | # | name | direction |
/// |---|------|-----------|
/// | 0 | `play_time_deviation` | minimize |
/// | 1 | `genre_entropy` | minimize |
/// | 2 | `tonal_key_entropy` | minimize |
/// | 3 | `bpm_jumps` | minimize |
/// | 4 | `beats_loudness_range` | minimize |
/// | 5 | `loudness_range` | minimize |
/// | 6 | `dissonance_range` | minimize |
/// | 7 | `mean_interest` | maximize |
/// | 8 | `mean_listens` | maximize |
/// | 9 | `mean_favorites` | maximize |
///
/// A playlist is valid when it has at least `min_len` tracks and no
/// repeated track.
#[derive(Debug, Clone)]
pub struct PlaylistProblem {
    catalog: TrackCatalog,
    spec: ObjectiveSpec,
    target_minutes: f64,
    initial_len: usize,
    min_len: usize,
}

impl PlaylistProblem {
    /// Creates a problem targeting `target_minutes` of play time.
    pub fn new(catalog: TrackCatalog, target_minutes: f64) -> Self {
        let spec = ObjectiveSpec::new(vec![
            Objective::minimize("play_time_deviation"),
            Objective::minimize("genre_entropy"),
            Objective::minimize("tonal_key_entropy"),
            Objective::minimize("bpm_jumps"),
            Objective::minimize("beats_loudness_range"),
            Objective::minimize("loudness_range"),
            Objective::minimize("dissonance_range"),
            Objective::maximize("mean_interest"),
            Objective::maximize("mean_listens"),
            Objective::maximize("mean_favorites"),
        ]);
        Self {
            catalog,
            spec,
            target_minutes,
            initial_len: DEFAULT_INITIAL_LEN,
            min_len: DEFAULT_MIN_LEN,
        }
    }

    /// Sets the length of initial playlists.
    pub fn with_initial_len(mut self, len: usize) -> Self {
        self.initial_len = len;
        self
    }

    /// Sets the minimum valid playlist length.
    pub fn with_min_len(mut self, len: usize) -> Self {
        self.min_len = len;
        self
    }

    /// The catalog genomes index into.
    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    /// Minimum valid playlist length.
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Resolves a genome to its tracks.
    pub fn tracks<'a>(&'a self, genome: &[usize]) -> std::result::Result<Vec<&'a Track>, EvaluationFailure> {
        genome
            .iter()
            .map(|&i| self.catalog.get(i).ok_or(EvaluationFailure::UnknownItem(i)))
            .collect()
    }
}

impl MoeaProblem for PlaylistProblem {
    type Genome = Vec<usize>;

    fn objectives(&self) -> &ObjectiveSpec {
        &self.spec
    }

    fn validate(&self) -> Result<()> {
        if self.initial_len < self.min_len {
            return Err(MoeaError::Configuration(format!(
                "initial playlist length {} is below the minimum {}",
                self.initial_len, self.min_len
            )));
        }
        if !self.target_minutes.is_finite() {
            return Err(MoeaError::Configuration(format!(
                "target play time must be finite, got {}",
                self.target_minutes
            )));
        }
        let required = self.initial_len.max(1);
        if self.catalog.len() < required {
            return Err(MoeaError::EmptyCatalog {
                available: self.catalog.len(),
                required,
            });
        }
        Ok(())
    }

    /// Samples `initial_len` distinct tracks.
    ///
    /// # Panics
    /// Panics if the catalog has fewer than `initial_len` tracks; the
    /// runner rejects such problems through `validate` first.
    fn create_genome<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        rand::seq::index::sample(rng, self.catalog.len(), self.initial_len).into_vec()
    }

    fn evaluate(&self, genome: &Vec<usize>) -> std::result::Result<FitnessVector, EvaluationFailure> {
        if genome.is_empty() {
            return Err(EvaluationFailure::EmptyGenome);
        }
        let tracks = self.tracks(genome)?;
        let n = tracks.len() as f64;

        let play_time: f64 = tracks.iter().map(|t| t.duration_minutes).sum();
        let genre_entropy = entropy(tracks.iter().map(|t| t.genres.iter().map(String::as_str)));
        let key_entropy = entropy(tracks.iter().map(|t| std::iter::once(t.tonal_key.as_str())));
        let bpm_jumps: f64 = tracks.windows(2).map(|w| (w[1].bpm - w[0].bpm).abs()).sum();
        let mean = |f: fn(&Track) -> f64| tracks.iter().map(|t| f(t)).sum::<f64>() / n;

        Ok(FitnessVector::new(vec![
            (play_time - self.target_minutes).abs(),
            genre_entropy,
            key_entropy,
            bpm_jumps,
            spread(tracks.iter().map(|t| t.beats_loudness)),
            spread(tracks.iter().map(|t| t.loudness)),
            spread(tracks.iter().map(|t| t.dissonance)),
            mean(|t: &Track| t.interest),
            mean(|t: &Track| t.listens),
            mean(|t: &Track| t.favorites),
        ]))
    }

    fn is_feasible(&self, genome: &Vec<usize>) -> bool {
        genome.len() >= self.min_len && genome.iter().collect::<HashSet<_>>().len() == genome.len()
    }

    fn crossover<R: Rng>(&self, a: &Vec<usize>, b: &Vec<usize>, rng: &mut R) -> (Vec<usize>, Vec<usize>) {
        one_point_crossover(a, b, rng)
    }

    /// Inserts a random track at a random position, or deletes a random
    /// track, with equal probability. Deleting at `min_len` becomes an
    /// insert, and inserting a track already present changes nothing.
    fn mutate<R: Rng>(&self, genome: &Vec<usize>, rng: &mut R) -> Vec<usize> {
        let delete = rng.random_bool(0.5) && genome.len() > self.min_len;
        if delete {
            return remove_at_random(genome, rng);
        }
        let track = rng.random_range(0..self.catalog.len());
        if genome.contains(&track) {
            genome.clone()
        } else {
            insert_at_random(genome, track, rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn track(id: &str, minutes: f64, genres: &[&str], key: &str, bpm: f64) -> Track {
        Track {
            id: id.to_string(),
            duration_minutes: minutes,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            tonal_key: key.to_string(),
            bpm,
            beats_loudness: bpm / 100.0,
            loudness: -bpm / 10.0,
            dissonance: 0.5,
            interest: 10.0,
            listens: 100.0,
            favorites: 1.0,
        }
    }

    fn catalog(n: usize) -> TrackCatalog {
        TrackCatalog::new(
            (0..n)
                .map(|i| {
                    let genre = ["Rock", "Jazz", "Pop"][i % 3];
                    let key = ["A", "C", "E", "G"][i % 4];
                    track(&format!("t{i}"), 3.0 + (i % 5) as f64, &[genre], key, 90.0 + i as f64)
                })
                .collect(),
        )
    }

    fn record(id: &str, duration: &str) -> TrackRecord {
        TrackRecord {
            id: id.to_string(),
            duration: Some(duration.to_string()),
            genres: Some(vec!["Electronic".into()]),
            tonal_key: Some("A".into()),
            bpm: Some(120.0),
            beats_loudness: Some(0.2),
            loudness: Some(-9.0),
            dissonance: Some(0.4),
            interest: Some(5.0),
            listens: Some(50.0),
            favorites: Some(2.0),
        }
    }

    // ---- Duration parsing ----

    #[test]
    fn test_parse_duration_shapes() {
        assert_eq!(parse_duration_minutes("45"), Some(0.75));
        assert_eq!(parse_duration_minutes("04:15"), Some(4.25));
        assert_eq!(parse_duration_minutes("01:02:30"), Some(62.5));
        assert_eq!(parse_duration_minutes(" 3:00 "), Some(3.0));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration_minutes(""), None);
        assert_eq!(parse_duration_minutes("abc"), None);
        assert_eq!(parse_duration_minutes("1:2:3:4"), None);
        assert_eq!(parse_duration_minutes("-5:00"), None);
        assert_eq!(parse_duration_minutes("inf"), None);
    }

    // ---- Catalog preparation ----

    #[test]
    fn test_record_to_track() {
        let track = record("a", "04:30").to_track().unwrap();
        assert_eq!(track.id, "a");
        assert!((track.duration_minutes - 4.5).abs() < 1e-12);
        assert_eq!(track.genres, vec!["Electronic".to_string()]);
    }

    #[test]
    fn test_record_missing_feature() {
        let mut r = record("a", "04:30");
        r.bpm = None;
        match r.to_track().unwrap_err() {
            MoeaError::InvalidRecord { item, reason } => {
                assert_eq!(item, "a");
                assert!(reason.contains("bpm"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_from_records_filters() {
        let mut no_genre = record("no-genre", "04:00");
        no_genre.genres = None;
        let records = vec![
            record("ok", "04:00"),
            record("short", "02:59"),
            record("long", "10:01"),
            record("edge-low", "03:00"),
            record("edge-high", "10:00"),
            record("bad", "x:y"),
            no_genre,
        ];
        let catalog = TrackCatalog::from_records(records, &CatalogFilter::default());
        let ids: Vec<&str> = catalog.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "edge-low", "edge-high"]);
    }

    #[test]
    fn test_from_records_required_genre() {
        let mut jazz = record("jazz", "05:00");
        jazz.genres = Some(vec!["Jazz".into(), "Blues".into()]);
        let filter = CatalogFilter {
            required_genre: Some("Blues".into()),
            ..CatalogFilter::default()
        };
        let catalog = TrackCatalog::from_records(vec![record("edm", "05:00"), jazz], &filter);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().id, "jazz");
    }

    // ---- Entropy ----

    #[test]
    fn test_entropy_uniform_and_constant() {
        let same = [["Rock"], ["Rock"], ["Rock"]];
        assert_eq!(entropy(same.iter().map(|g| g.iter().copied())), 0.0);

        let four = [["a"], ["b"], ["c"], ["d"]];
        let h = entropy(four.iter().map(|g| g.iter().copied()));
        assert!((h - 4.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_multi_valued_counts_once_per_item() {
        // p(Rock) = 2/2, p(Pop) = 1/2; the repeated label in item 0 counts once
        let items: Vec<Vec<&str>> = vec![vec!["Rock", "Rock", "Pop"], vec!["Rock"]];
        let h = entropy(items.iter().map(|v| v.iter().copied()));
        let expected = -(0.5f64 * 0.5f64.ln());
        assert!((h - expected).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_empty() {
        let none: Vec<Vec<&str>> = Vec::new();
        assert_eq!(entropy(none.iter().map(|v| v.iter().copied())), 0.0);
    }

    // ---- Evaluation ----

    #[test]
    fn test_evaluate_objectives() {
        let catalog = TrackCatalog::new(vec![
            track("a", 4.0, &["Rock"], "A", 100.0),
            track("b", 5.0, &["Rock", "Pop"], "A", 110.0),
            track("c", 6.0, &["Jazz"], "C", 90.0),
        ]);
        let problem = PlaylistProblem::new(catalog, 20.0);
        let f = problem.evaluate(&vec![0, 1, 2]).unwrap();
        let v = f.values();

        assert_eq!(v.len(), 10);
        assert!((v[0] - 5.0).abs() < 1e-12);
        let p: [f64; 3] = [2.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];
        let genre: f64 = p.iter().map(|p| -p * p.ln()).sum();
        assert!((v[1] - genre).abs() < 1e-12);
        let key: f64 = [2.0f64 / 3.0, 1.0 / 3.0].iter().map(|p| -p * p.ln()).sum();
        assert!((v[2] - key).abs() < 1e-12);
        assert!((v[3] - 30.0).abs() < 1e-12);
        assert!((v[4] - 0.2).abs() < 1e-12);
        assert!((v[5] - 2.0).abs() < 1e-12);
        assert_eq!(v[6], 0.0);
        assert_eq!(&v[7..], &[10.0, 100.0, 1.0]);
    }

    #[test]
    fn test_evaluate_order_matters_for_bpm() {
        let problem = PlaylistProblem::new(catalog(6), 60.0);
        let smooth = problem.evaluate(&vec![0, 1, 2, 3]).unwrap();
        let jumpy = problem.evaluate(&vec![0, 3, 1, 2]).unwrap();
        assert!(smooth[3] < jumpy[3]);
        assert_eq!(smooth[0], jumpy[0]);
    }

    #[test]
    fn test_evaluate_failures() {
        let problem = PlaylistProblem::new(catalog(4), 60.0);
        assert_eq!(problem.evaluate(&vec![]), Err(EvaluationFailure::EmptyGenome));
        assert_eq!(
            problem.evaluate(&vec![0, 1, 99]),
            Err(EvaluationFailure::UnknownItem(99))
        );
    }

    #[test]
    fn test_feasibility() {
        let problem = PlaylistProblem::new(catalog(10), 60.0);
        assert!(problem.is_feasible(&vec![0, 1, 2]));
        assert!(!problem.is_feasible(&vec![0, 1]));
        assert!(!problem.is_feasible(&vec![0, 1, 1]));
    }

    // ---- Operators ----

    #[test]
    fn test_create_genome_distinct() {
        let problem = PlaylistProblem::new(catalog(30), 60.0);
        let mut rng = create_rng(42);
        for _ in 0..20 {
            let g = problem.create_genome(&mut rng);
            assert_eq!(g.len(), DEFAULT_INITIAL_LEN);
            assert!(problem.is_feasible(&g));
            assert!(g.iter().all(|&i| i < 30));
        }
    }

    #[test]
    fn test_mutate_never_below_minimum() {
        let problem = PlaylistProblem::new(catalog(8), 60.0);
        let mut rng = create_rng(7);
        let genome = vec![0, 1, 2];
        for _ in 0..200 {
            let child = problem.mutate(&genome, &mut rng);
            assert!(child.len() >= 3);
            assert!(child.len() <= 4);
        }
        assert_eq!(genome, vec![0, 1, 2]);
    }

    #[test]
    fn test_mutate_changes_length_by_at_most_one() {
        let problem = PlaylistProblem::new(catalog(50), 60.0);
        let mut rng = create_rng(3);
        let genome: Vec<usize> = (0..10).collect();
        let mut grew = false;
        let mut shrank = false;
        for _ in 0..200 {
            let child = problem.mutate(&genome, &mut rng);
            assert!(problem.is_feasible(&child));
            match child.len() {
                11 => grew = true,
                9 => shrank = true,
                10 => assert_eq!(child, genome),
                n => panic!("unexpected length {n}"),
            }
        }
        assert!(grew && shrank);
    }

    #[test]
    fn test_crossover_keeps_lengths() {
        let problem = PlaylistProblem::new(catalog(50), 60.0);
        let mut rng = create_rng(11);
        let a: Vec<usize> = (0..6).collect();
        let b: Vec<usize> = (20..30).collect();
        let (c1, c2) = problem.crossover(&a, &b, &mut rng);
        assert_eq!(c1.len(), b.len());
        assert_eq!(c2.len(), a.len());
        assert_eq!(c1[0], a[0]);
        assert_eq!(c2[0], b[0]);
    }

    // ---- Validation ----

    #[test]
    fn test_validate_catalog_too_small() {
        let problem = PlaylistProblem::new(catalog(5), 60.0).with_initial_len(6);
        assert_eq!(
            problem.validate(),
            Err(MoeaError::EmptyCatalog {
                available: 5,
                required: 6
            })
        );
        assert!(PlaylistProblem::new(catalog(6), 60.0)
            .with_initial_len(6)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_initial_below_minimum() {
        let problem = PlaylistProblem::new(catalog(30), 60.0)
            .with_initial_len(2)
            .with_min_len(3);
        assert!(matches!(problem.validate(), Err(MoeaError::Configuration(_))));
    }
}
