use proptest::prelude::*;
use schemagen::naming::{pluralize, singularize, to_camel_case, to_pascal_case, to_snake_case};

fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,15}"
}

fn snake_identifier() -> impl Strategy<Value = String> {
    "[a-z]{1,10}(_[a-z]{1,10}){0,3}"
}

fn table_name() -> impl Strategy<Value = String> {
    prop_oneof![
        snake_identifier(),
        snake_identifier().prop_map(|s| pluralize(&s)),
        prop::sample::select(vec![
            "people", "children", "statuses", "addresses", "categories", "order_items",
            "user_data", "mice", "indices", "analyses", "buses", "wolves", "knives", "OrderItems",
            "URLs", "HTTPServers",
        ])
        .prop_map(str::to_string),
    ]
}

proptest! {
    #[test]
    fn singularize_is_idempotent(name in table_name()) {
        let once = singularize(&name);
        prop_assert_eq!(singularize(&once), once);
    }

    #[test]
    fn pascal_case_is_idempotent(name in identifier()) {
        let once = to_pascal_case(&name);
        prop_assert_eq!(to_pascal_case(&once), once);
    }

    #[test]
    fn snake_of_pascal_is_stable(name in identifier()) {
        let once = to_snake_case(&to_pascal_case(&name));
        prop_assert_eq!(to_snake_case(&to_pascal_case(&once)), once.clone());
        prop_assert_eq!(to_snake_case(&once), once);
    }

    #[test]
    fn snake_round_trips_through_pascal(name in "[a-z]{2,8}(_[a-z]{2,8}){0,3}") {
        prop_assert_eq!(to_snake_case(&to_pascal_case(&name)), name);
    }

    #[test]
    fn camel_case_lowers_only_the_first_word(name in snake_identifier()) {
        let camel = to_camel_case(&name);
        let pascal = to_pascal_case(&name);
        prop_assert_eq!(camel.to_lowercase(), pascal.to_lowercase());
        prop_assert!(camel.chars().next().is_some_and(|c| c.is_lowercase()));
    }

    #[test]
    fn conversions_are_deterministic(name in identifier()) {
        prop_assert_eq!(to_pascal_case(&name), to_pascal_case(&name));
        prop_assert_eq!(singularize(&name), singularize(&name));
        prop_assert_eq!(pluralize(&name), pluralize(&name));
    }
}

#[test]
fn test_single_letter_and_acronym_inputs() {
    assert_eq!(to_pascal_case("x"), "X");
    assert_eq!(to_snake_case("X"), "x");
    assert_eq!(to_pascal_case("ID"), "Id");
    assert_eq!(to_pascal_case("user_ID"), "UserId");
    assert_eq!(to_snake_case("userID"), "user_id");
    assert_eq!(to_pascal_case("URLs"), "Urls");
    assert_eq!(to_pascal_case("IDs"), "Ids");
    assert_eq!(to_snake_case("userIDs"), "user_ids");
    assert_eq!(to_pascal_case("already_snake_case"), "AlreadySnakeCase");
    assert_eq!(singularize("x"), "x");
}

#[test]
fn test_already_singular_words_are_unchanged() {
    for word in ["status", "bus", "person", "child", "news", "analysis", "address"] {
        assert_eq!(singularize(word), word);
    }
}
