mod helpers;

use helium_index::{
    catalog::Catalog,
    common::{
        types::{DataType, RowSet},
        value::Value,
    },
    config::Config,
    error::IndexError,
    query::{Operator, Predicate, QueryEvaluator, QueryNode},
    storage::index::IndexKind,
};
use maplit::btreeset;

use helpers::data::AGES;

fn catalog(kinds: &[IndexKind]) -> Catalog {
    helpers::init_logging_for_tests();

    let config = Config::default().with_order(3);
    let mut catalog = Catalog::new();
    for kind in kinds {
        catalog
            .add_index("age", kind.create("age", DataType::Int64, &config))
            .unwrap();
    }
    for (rid, age) in AGES.into_iter().enumerate() {
        catalog.insert("age", &Value::Int64(age), rid as u32).unwrap();
    }
    catalog
}

fn eval(catalog: &Catalog, node: &QueryNode) -> RowSet {
    QueryEvaluator::new(catalog).evaluate(node, 3).unwrap()
}

fn age(op: Operator, v: i64) -> QueryNode {
    Predicate::new("age", op, v).into()
}

#[test]
fn range_minus_equality() {
    let catalog = catalog(&[IndexKind::BPlusTree]);
    let query = QueryNode::and(
        Predicate::range("age", 20, 35).into(),
        QueryNode::not(age(Operator::Eq, 30)),
    );

    assert_eq!(eval(&catalog, &query), btreeset! {1});
}

#[test]
fn each_operator_on_the_tree() {
    let catalog = catalog(&[IndexKind::BPlusTree]);

    assert_eq!(eval(&catalog, &age(Operator::Eq, 25)), btreeset! {1});
    assert_eq!(eval(&catalog, &age(Operator::Lt, 30)), btreeset! {0, 1});
    assert_eq!(eval(&catalog, &age(Operator::Le, 30)), btreeset! {0, 1, 2});
    assert_eq!(eval(&catalog, &age(Operator::Gt, 30)), btreeset! {3});
    assert_eq!(eval(&catalog, &age(Operator::Ge, 30)), btreeset! {2, 3});
    assert_eq!(
        eval(&catalog, &Predicate::range("age", 18, 25).into()),
        btreeset! {0, 1}
    );
}

#[test]
fn every_index_mix_gives_the_same_answers() {
    let mixes: [&[IndexKind]; 4] = [
        &[IndexKind::BPlusTree],
        &[IndexKind::Bitmap],
        &[IndexKind::Hash, IndexKind::BPlusTree],
        &[IndexKind::Hash, IndexKind::Bitmap, IndexKind::BPlusTree],
    ];
    let queries = [
        age(Operator::Eq, 40),
        age(Operator::Ge, 25),
        QueryNode::or(age(Operator::Lt, 20), age(Operator::Gt, 35)),
        QueryNode::not(Predicate::range("age", 25, 30).into()),
    ];

    let baseline = catalog(mixes[0]);
    for mix in &mixes[1..] {
        let catalog = catalog(mix);
        for q in &queries {
            assert_eq!(eval(&catalog, q), eval(&baseline, q), "{mix:?}: {q}");
        }
    }
}

#[test]
fn hash_only_attribute_rejects_ordered_operators() {
    let catalog = catalog(&[IndexKind::Hash]);

    assert_eq!(eval(&catalog, &age(Operator::Eq, 18)), btreeset! {0});
    assert_eq!(
        QueryEvaluator::new(&catalog)
            .evaluate(&age(Operator::Lt, 30), 3)
            .unwrap_err(),
        IndexError::NoIndex {
            attribute: "age".into(),
            operator: Operator::Lt,
        }
    );
}

#[test]
fn de_morgan() {
    let catalog = catalog(&[IndexKind::BPlusTree]);
    let a = age(Operator::Lt, 30);
    let b = age(Operator::Ge, 25);

    let lhs = QueryNode::not(QueryNode::and(a.clone(), b.clone()));
    let rhs = QueryNode::or(QueryNode::not(a), QueryNode::not(b));
    assert_eq!(eval(&catalog, &lhs), eval(&catalog, &rhs));
}

#[test]
fn complement_of_nothing_is_the_universe() {
    let catalog = catalog(&[IndexKind::BPlusTree]);
    let nothing = age(Operator::Gt, 100);

    assert!(eval(&catalog, &nothing).is_empty());
    assert_eq!(eval(&catalog, &QueryNode::not(nothing)), btreeset! {0, 1, 2, 3});
}

#[test]
fn deleted_keys_drop_out_of_results() {
    let mut catalog = catalog(&[IndexKind::Hash, IndexKind::BPlusTree]);

    assert!(catalog.delete("age", &Value::Int64(25)).unwrap());
    assert!(!catalog.delete("age", &Value::Int64(25)).unwrap());

    assert!(eval(&catalog, &age(Operator::Eq, 25)).is_empty());
    assert_eq!(eval(&catalog, &age(Operator::Lt, 30)), btreeset! {0});
}

#[test]
fn wrong_literal_type_is_reported() {
    let catalog = catalog(&[IndexKind::BPlusTree]);
    let query: QueryNode = Predicate::eq("age", "thirty").into();

    assert!(matches!(
        QueryEvaluator::new(&catalog).evaluate(&query, 3),
        Err(IndexError::TypeMismatch { .. })
    ));
}
