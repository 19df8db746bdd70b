use std::collections::BTreeSet;

use generalized_suffix_index::text::{longest_common_substrings_dp, substrings};
use generalized_suffix_index::{DocId, GeneralizedSuffixTree, Limit, TreeError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(test)]
mod tests {

    use super::*;

    fn ids(list: &[DocId]) -> BTreeSet<DocId> {
        list.iter().copied().collect()
    }

    fn strings(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Inserts `words` under ids `0..n`, then again under `n..2n`, checking
    /// after each insertion that the new document is found by all of its
    /// substrings and finally that every substring maps to exactly the
    /// documents containing it.
    fn check_corpus(words: &[&str], again: bool) -> GeneralizedSuffixTree {
        let mut tree = GeneralizedSuffixTree::new();
        let mut entries: Vec<(&str, DocId)> = Vec::new();
        let rounds = if again { 2 } else { 1 };
        for round in 0..rounds {
            for (i, &word) in words.iter().enumerate() {
                let id = (round * words.len() + i) as DocId;
                tree.insert(word, id).unwrap();
                entries.push((word, id));
                for s in substrings(word) {
                    assert!(
                        tree.search(&s).contains(&id),
                        "{:?} not found after adding {:?}",
                        s,
                        word
                    );
                }
            }
        }
        for (word, _) in &entries {
            for s in substrings(word) {
                let expected: BTreeSet<DocId> = entries
                    .iter()
                    .filter(|(w, _)| w.contains(s.as_str()))
                    .map(|&(_, id)| id)
                    .collect();
                assert_eq!(tree.search(&s), expected, "wrong ids for {:?}", s);
            }
        }
        tree
    }

    fn check_counts(tree: &GeneralizedSuffixTree) {
        let mut stack = vec![tree.root()];
        while let Some(node) = stack.pop() {
            assert_eq!(node.cached_count(), Ok(node.collect(Limit::All).len()));
            stack.extend(node.edges().map(|(_, child)| child));
        }
    }

    #[test]
    fn test_basic_tree_generation() {
        let tree = check_corpus(&["cacao"], false);
        assert!(tree.search("caco").is_empty());
        assert!(tree.search("cacaoo").is_empty());
        assert!(tree.search("ccacao").is_empty());
        assert!(tree.search("x").is_empty());
        assert_eq!(tree.search("a"), ids(&[0]));
        assert_eq!(tree.search("ca"), ids(&[0]));

        let tree = check_corpus(&["bookkeeper"], false);
        assert!(tree.search("books").is_empty());
        assert!(tree.search("boke").is_empty());
        assert!(tree.search("ookepr").is_empty());
    }

    #[test]
    fn test_weird_word() {
        check_corpus(&["cacacato"], false);
    }

    #[test]
    fn test_double() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("cacao", 0).unwrap();
        tree.insert("cacao", 1).unwrap();
        for s in substrings("cacao") {
            assert_eq!(tree.search(&s), ids(&[0, 1]));
        }
        assert_eq!(tree.document_count(), 2);
    }

    #[test]
    fn test_banana_addition() {
        let tree = check_corpus(&["banana", "bano", "ba"], true);
        assert_eq!(tree.search("ban"), ids(&[0, 1, 3, 4]));
        assert_eq!(tree.search("ana"), ids(&[0, 3]));

        let mut tree = GeneralizedSuffixTree::new();
        for (id, word) in ["banana", "bano", "ba"].iter().enumerate() {
            tree.insert(word, id as DocId).unwrap();
        }
        assert_eq!(tree.search("ban"), ids(&[0, 1]));
        assert_eq!(tree.search("ba"), ids(&[0, 1, 2]));
        assert_eq!(tree.longest_common_substring(), strings(&["ba"]));
    }

    #[test]
    fn test_addition() {
        let mut tree = check_corpus(
            &["cacaor", "caricato", "cacato", "cacata", "caricata", "cacao", "banana"],
            true,
        );
        assert_eq!(tree.compute_count(), 14);
        check_counts(&tree);
        assert!(tree.search("aoca").is_empty());
    }

    #[test]
    fn test_sample_addition() {
        let words = [
            "libertypike",
            "franklintn",
            "carothersjohnhenryhouse",
            "carothersezealhouse",
            "acrossthetauntonriverfromdightonindightonrockstatepark",
            "dightonma",
            "dightonrock",
            "6mineoflowgaponlowgapfork",
            "lowgapky",
            "lemasterjohnjandellenhouse",
            "lemasterhouse",
            "70wilburblvd",
            "poughkeepsieny",
            "freerhouse",
            "701laurelst",
            "conwaysc",
            "hollidayjwjrhouse",
            "mainandappletonsts",
            "menomoneefallswi",
            "mainstreethistoricdistrict",
            "addressrestricted",
            "brownsmillsnj",
            "hanoverfurnace",
            "hanoverbogironfurnace",
            "sofsavannahatfergusonaveandbethesdard",
            "savannahga",
            "bethesdahomeforboys",
            "bethesda",
        ];
        let mut tree = check_corpus(&words, true);
        assert_eq!(tree.compute_count(), words.len() * 2);
        check_counts(&tree);
        assert!(tree.search("aoca").is_empty());
        assert_eq!(tree.search("dighton"), ids(&[4, 5, 6, 32, 33, 34]));
    }

    #[test]
    fn test_simplest_possible_sample() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("a", 0).unwrap();
        tree.insert("ab", 1).unwrap();
        assert_eq!(tree.search("a"), ids(&[0, 1]));
        assert_eq!(tree.search("b"), ids(&[1]));
        assert_eq!(tree.search("ab"), ids(&[1]));
    }

    #[test]
    fn test_unicode() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("こんにちは", 1).unwrap();
        assert_eq!(tree.search("んに"), ids(&[1]));
        assert_eq!(tree.search("に"), ids(&[1]));
        assert_eq!(tree.search("は"), ids(&[1]));
        assert!(tree.search("さ").is_empty());
    }

    #[test]
    fn test_supplementary_characters() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("😀😁😂", 1).unwrap();
        assert_eq!(tree.search("😁"), ids(&[1]));
        assert_eq!(tree.search("😂"), ids(&[1]));
        assert_eq!(tree.search("😀😁😂"), ids(&[1]));
        assert!(tree.search("🤣").is_empty());
        assert!(tree.search("😂😀").is_empty());
    }

    #[test]
    fn test_substring_to_term_matching() {
        let terms = ["tablett", "fleischtablett", "salz", "pfeffer", "kämpft", "grünen"];
        let mut tree = GeneralizedSuffixTree::new();
        for (i, term) in terms.iter().enumerate() {
            tree.insert(term, i as DocId).unwrap();
        }
        assert_eq!(tree.search("tablett"), ids(&[0, 1]));
        assert_eq!(tree.search("blet"), ids(&[0, 1]));
        assert_eq!(tree.search("feff"), ids(&[3]));
        assert_eq!(tree.search("ün"), ids(&[5]));
        assert_eq!(tree.search("äm"), ids(&[4]));
        assert!(tree.longest_common_substring().is_empty());
    }

    #[test]
    fn test_search_limited() {
        let tree = check_corpus(&["tablett", "fleischtablett", "tabletten"], false);
        assert_eq!(tree.search_limited("tablett", 2).len(), 2);
        assert!(tree.search_limited("tablett", 2).is_subset(&ids(&[0, 1, 2])));
        assert!(tree.search_limited("tablett", 0).is_empty());
        assert_eq!(tree.search_limited("tablett", 10), ids(&[0, 1, 2]));
        assert!(tree.search_limited("zz", 3).is_empty());
    }

    #[test]
    fn test_extension_past_document_end() {
        let words = ["cacao", "bookkeeper", "ä😀"];
        let tree = check_corpus(&words, false);
        for word in words {
            for s in substrings(word) {
                let extended = format!("{}z", s);
                assert!(tree.search(&extended).is_empty(), "{:?} should be absent", extended);
                assert!(!tree.is_substr(&extended));
            }
        }
        assert!(tree.search("z").is_empty());
    }

    #[test]
    fn test_empty_query() {
        let tree = check_corpus(&["cacao"], false);
        assert!(tree.search("").is_empty());
        assert!(!tree.is_substr(""));
        assert!(tree.is_substr("aca"));
        assert!(!tree.is_substr("acc"));
    }

    #[test]
    fn test_result_count_policy() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("cacao", 0).unwrap();
        assert_eq!(tree.result_count(), Err(TreeError::CountNotComputed));
        assert_eq!(tree.compute_count(), 1);
        assert_eq!(tree.result_count(), Ok(1));
        tree.insert("cacao", 1).unwrap();
        assert_eq!(tree.result_count(), Err(TreeError::CountNotComputed));
        tree.compute_count();
        assert_eq!(tree.result_count(), Ok(2));
        check_counts(&tree);
    }

    #[test]
    fn test_out_of_order_ids() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("abc", 5).unwrap();
        let err = tree.insert("abd", 4).unwrap_err();
        assert_eq!(err, TreeError::OutOfOrderId { id: 4, last: 5 });
        assert_eq!(err.to_string(), "Document id 4 is lower than the previously inserted id 5");
        assert!(tree.search("bd").is_empty());
    }

    #[test]
    fn test_longest_common_substring() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("VOTEFORTHEGREATALBANIAFORYOU", 0).unwrap();
        tree.insert("CHOOSETHEGREATALBANIANFUTURE", 1).unwrap();
        assert_eq!(tree.longest_common_substring(), strings(&["THEGREATALBANIA"]));
        tree.insert("VOTECHOOSEGREATALBANIATHEFUTURE", 2).unwrap();
        assert_eq!(tree.longest_common_substring(), strings(&["EGREATALBANIA"]));

        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("abXcd", 0).unwrap();
        tree.insert("cdYab", 1).unwrap();
        assert_eq!(tree.longest_common_substring(), strings(&["ab", "cd"]));
    }

    #[test]
    fn test_longest_common_substring_edge_cases() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("abcde", 0).unwrap();
        assert_eq!(tree.longest_common_substring(), strings(&["abcde"]));

        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("abc", 0).unwrap();
        tree.insert("xyz", 1).unwrap();
        assert!(tree.longest_common_substring().is_empty());

        assert_eq!(
            generalized_suffix_index::longest_common_substrings(&["abcdefg", "xxcdeyy", "cdez"]),
            Ok(strings(&["cde"]))
        );
        assert_eq!(
            generalized_suffix_index::longest_common_substrings(&[String::from("single")]),
            Ok(strings(&["single"]))
        );
        let none: [&str; 0] = [];
        assert_eq!(generalized_suffix_index::longest_common_substrings(&none), Ok(BTreeSet::new()));
    }

    fn gen_random_string(rng: &mut StdRng, len: usize, alphabet: &[char]) -> String {
        (0..len).map(|_| alphabet[rng.gen_range(0..alphabet.len())]).collect()
    }

    #[test]
    fn test_longest_common_substring_cross_check() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let alphabet = ['a', 'b', 'c', 'ä', '😀'];
        for _ in 0..300 {
            let len1 = rng.gen_range(0..40);
            let len2 = rng.gen_range(0..40);
            let s1 = gen_random_string(&mut rng, len1, &alphabet);
            let s2 = gen_random_string(&mut rng, len2, &alphabet);
            let mut tree = GeneralizedSuffixTree::new();
            tree.insert(&s1, 0).unwrap();
            tree.insert(&s2, 1).unwrap();
            assert_eq!(
                tree.longest_common_substring(),
                longest_common_substrings_dp(&s1, &s2),
                "{:?} / {:?}",
                s1,
                s2
            );
        }
    }

    #[test]
    #[ignore]
    fn test_long_periodic_document() {
        let text: String = "ab".repeat(50_000);
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert(&text, 0).unwrap();
        tree.insert(&text[1..], 1).unwrap();
        assert_eq!(tree.search("baba"), ids(&[0, 1]));
        assert_eq!(tree.compute_count(), 2);
        let lcs = tree.longest_common_substring();
        assert_eq!(lcs.iter().next().map(String::len), Some(text.len() - 1));
    }
}
