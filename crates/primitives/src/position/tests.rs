use proptest::prelude::*;

use super::*;

#[test]
fn orders_by_line_then_character() {
	let a = Position::new(1, 9);
	let b = Position::new(2, 0);
	assert!(a.is_before(&b));
	assert!(b.is_after(&a));
	assert!(Position::new(2, 1).is_after(&b));
	assert_eq!(a.compare_to(&b), Ordering::Less);
	assert_eq!(b.compare_to(&b), Ordering::Equal);
	assert!(b.is_before_or_equal(&b));
	assert!(b.is_after_or_equal(&b));
}

#[test]
fn try_new_names_negative_field() {
	assert_eq!(Position::try_new(-1, 0), Err(GeometryError::InvalidArgument { name: "line" }));
	assert_eq!(Position::try_new(0, -3), Err(GeometryError::InvalidArgument { name: "character" }));
	assert_eq!(Position::try_new(4, 2), Ok(Position::new(4, 2)));
}

#[test]
fn translate_and_with() {
	let p = Position::new(3, 4);
	assert_eq!(p.translate(0, 0), Ok(p));
	assert_eq!(p.translate(-1, 2), Ok(Position::new(2, 6)));
	assert_eq!(p.translate(-4, 0), Err(GeometryError::InvalidArgument { name: "line" }));
	assert_eq!(p.translate(0, -5), Err(GeometryError::InvalidArgument { name: "character" }));
	assert_eq!(p.with(None, None), p);
	assert_eq!(p.with(Some(7), None), Position::new(7, 4));
	assert_eq!(p.with(None, Some(0)), Position::new(3, 0));
}

#[test]
fn min_and_max_of() {
	let ps = [Position::new(2, 2), Position::new(0, 5), Position::new(2, 9)];
	assert_eq!(Position::min_of(ps), Some(Position::new(0, 5)));
	assert_eq!(Position::max_of(ps), Some(Position::new(2, 9)));
	assert_eq!(Position::min_of([Position::new(1, 1)]), Some(Position::new(1, 1)));
	assert_eq!(Position::max_of(std::iter::empty()), None);
}

#[test]
fn deserialize_rejects_negative_components() {
	let ok: Position = serde_json::from_str(r#"{"line":1,"character":2}"#).unwrap();
	assert_eq!(ok, Position::new(1, 2));

	let err = serde_json::from_str::<Position>(r#"{"line":-1,"character":2}"#).unwrap_err();
	assert!(err.to_string().contains("line must be non-negative"), "{err}");
}

fn arb_position() -> impl Strategy<Value = Position> {
	(0u32..50, 0u32..50).prop_map(|(line, character)| Position::new(line, character))
}

proptest! {
	#[test]
	fn prop_total_order(p in arb_position(), q in arb_position()) {
		let holds = [p.is_before(&q), p.is_equal(&q), p.is_after(&q)];
		prop_assert_eq!(holds.iter().filter(|&&b| b).count(), 1);
	}

	#[test]
	fn prop_predicates_agree(p in arb_position(), q in arb_position()) {
		prop_assert_eq!(p.is_after(&q), !p.is_before_or_equal(&q));
		prop_assert_eq!(p.is_before(&q), !p.is_after_or_equal(&q));
		prop_assert_eq!(p.is_before(&q), q.is_after(&p));
		prop_assert_eq!(p.compare_to(&q), p.cmp(&q));
	}
}
