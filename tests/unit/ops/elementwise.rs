use super::*;

#[test]
fn operators_are_component_wise() {
    let a = Rgba::new(0.5, 0.25, 1.0, 1.0);
    let b = Rgba::new(0.5, 0.5, 0.5, 1.0);
    assert_eq!(
        ElementwiseOp::Multiply.apply(a, b),
        Rgba::new(0.25, 0.125, 0.5, 1.0)
    );
    assert_eq!(
        ElementwiseOp::Divide.apply(a, b),
        Rgba::new(1.0, 0.5, 2.0, 1.0)
    );
    assert_eq!(ElementwiseOp::Add.apply(a, b), Rgba::new(1.0, 0.75, 1.5, 2.0));
    assert_eq!(
        ElementwiseOp::Subtract.apply(a, b),
        Rgba::new(0.0, -0.25, 0.5, 0.0)
    );
}

#[test]
fn division_by_zero_is_ieee_and_clamps_away() {
    let out = ElementwiseOp::Divide.apply(Rgba::new(1.0, 0.0, 0.5, 0.0), Rgba::TRANSPARENT);
    assert!(out.r.is_infinite());
    assert!(out.g.is_nan());
    assert_eq!(out.clamped(), Rgba::new(1.0, 0.0, 1.0, 0.0));
}

#[test]
fn names_round_trip() {
    for op in [
        ElementwiseOp::Multiply,
        ElementwiseOp::Divide,
        ElementwiseOp::Add,
        ElementwiseOp::Subtract,
    ] {
        assert_eq!(ElementwiseOp::from_name(op.name()).unwrap(), op);
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(json, format!("\"{}\"", op.name()));
    }
    assert!(ElementwiseOp::from_name("screen").is_err());
}
