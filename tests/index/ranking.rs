//! How matches are ordered.

use chronicle::testing::{make_line, make_word};
use chronicle::{Fragment, FuzzyIndex, SearchOptions};

fn index(fragments: &[Fragment]) -> FuzzyIndex {
    FuzzyIndex::build(fragments, SearchOptions::default())
}

#[test]
fn test_exact_beats_single_typo() {
    let corpus = vec![make_line("typo", "Meijl era"), make_line("exact", "Meiji era")];
    assert_eq!(index(&corpus).search("meiji", 10), ["exact", "typo"]);
}

#[test]
fn test_typo_within_threshold_matches_beyond_does_not() {
    let corpus = vec![make_line("l1", "Restoratoin of imperial rule")];
    let idx = index(&corpus);
    // 11 chars allow 3 edits; a transposition costs 2
    assert_eq!(idx.search("restoration", 10), ["l1"]);
    // 5 chars allow 1 edit; a transposition is too many
    assert!(idx.search("meiij", 10).is_empty());
}

#[test]
fn test_short_fragment_outranks_long_one() {
    let corpus = vec![
        make_line("long", "Edo period woodblock prints of the Tokaido road"),
        make_word("short", "Edo"),
    ];
    assert_eq!(index(&corpus).search("edo", 10), ["short", "long"]);
}

#[test]
fn test_equal_scores_keep_corpus_order() {
    let corpus = vec![
        make_word("b", "Nagasaki"),
        make_word("a", "Nagasaki"),
        make_word("c", "Nagasaki"),
    ];
    assert_eq!(index(&corpus).search("nagasaki", 10), ["b", "a", "c"]);
}

#[test]
fn test_location_is_ignored() {
    let corpus = vec![make_line(
        "l1",
        "a very long caption that only mentions Hakodate at the very end",
    )];
    assert_eq!(index(&corpus).search("hakodate", 10), ["l1"]);
}

#[test]
fn test_query_is_normalized_like_fragments() {
    let corpus = vec![make_line("l1", "Ｔｏｋｙｏ Station")];
    let idx = index(&corpus);
    assert_eq!(idx.search("TOKYO!!", 10), ["l1"]);
    assert_eq!(idx.search("  tokyo   station ", 10), ["l1"]);
}

#[test]
fn test_single_char_and_empty_queries_return_nothing() {
    let corpus = vec![make_line("l1", "a b c"), make_word("w1", "a")];
    let idx = index(&corpus);
    assert!(idx.search("a", 10).is_empty());
    assert!(idx.search("", 10).is_empty());
    assert!(idx.search("?!", 10).is_empty());
}

#[test]
fn test_limit_keeps_the_best() {
    let corpus: Vec<Fragment> = (0..20)
        .map(|i| make_line(&format!("l{}", i), &format!("Yokohama pier {}", i)))
        .collect();
    let idx = index(&corpus);
    assert_eq!(idx.search("yokohama", 3), ["l0", "l1", "l2"]);
    assert_eq!(idx.search("yokohama", 0).len(), 0);
}

#[test]
fn test_cjk_text_matches() {
    let corpus = vec![make_line("l1", "明治維新 1868"), make_line("l2", "江戸城")];
    assert_eq!(index(&corpus).search("明治維新", 10), ["l1"]);
}

#[test]
fn test_stricter_threshold_drops_fuzzy_hits() {
    let corpus = vec![make_line("typo", "Meijl era"), make_line("exact", "Meiji era")];
    let options = SearchOptions {
        threshold: 0.0,
        ..SearchOptions::default()
    };
    let idx = FuzzyIndex::build(&corpus, options);
    assert_eq!(idx.search("meiji", 10), ["exact"]);
}
