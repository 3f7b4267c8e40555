use super::TypeExpr;
use super::naming::{composite_name, wrapper_name, written_form};

#[test]
fn composite_prefixes_follow_declaration_order() {
    let expr = TypeExpr::slice(TypeExpr::pointer(TypeExpr::slice(TypeExpr::named("int"))));
    assert_eq!(written_form(&expr), "[]*[]int");
    assert_eq!(composite_name(&expr), "ArrayOfPtrToArrayOfInt");
}

#[test]
fn leading_pointers_share_the_pointee_name() {
    let plain = TypeExpr::qualified("pkg", "Msg");
    let pointer = TypeExpr::pointer(TypeExpr::pointer(plain.clone()));
    assert_eq!(composite_name(&plain), composite_name(&pointer));
    assert_eq!(written_form(&pointer), "**pkg.Msg");
}

#[test]
fn map_key_is_named_by_its_own_base() {
    let expr = TypeExpr::map(
        TypeExpr::slice(TypeExpr::named("byte")),
        TypeExpr::named("Msg"),
    );
    assert_eq!(composite_name(&expr), "MapOfArrayOfByteToMsg");

    let nested = TypeExpr::map(
        TypeExpr::named("string"),
        TypeExpr::map(TypeExpr::named("int"), TypeExpr::named("bool")),
    );
    assert_eq!(composite_name(&nested), "MapOfStringToMapOfIntToBool");
    assert_eq!(written_form(&nested), "map[string]map[int]bool");
}

#[test]
fn wrapper_names() {
    assert_eq!(wrapper_name("Msg"), "MsgRef");
    assert_eq!(wrapper_name("ArrayOfPtrToMsg"), "ArrayOfPtrToMsgRef");
}
