use std::collections::BTreeMap;

use llsd::{decode, to_value, to_xml, LlsdError, Map, Value};
use serde::Serialize;

#[derive(Serialize)]
struct Agent {
    name: String,
    age: u32,
    online: bool,
    balance: f64,
    tags: Vec<&'static str>,
    home: Option<Region>,
}

#[derive(Serialize)]
struct Region {
    x: i32,
    y: i32,
}

#[derive(Serialize)]
struct Handle(u16);

#[derive(Serialize)]
enum Event {
    Logout,
    Teleport(Region),
    Chat(String, u8),
    Move { dx: i8, dy: i8 },
}

#[test]
fn struct_to_document() {
    let agent = Agent {
        name: "Tester".into(),
        age: 30,
        online: true,
        balance: 12.5,
        tags: vec!["a", "b"],
        home: None,
    };
    let xml = to_xml(&agent).unwrap();
    assert_eq!(
        xml,
        "<llsd><map>\
         <key>name</key><string>Tester</string>\
         <key>age</key><integer>30</integer>\
         <key>online</key><boolean>true</boolean>\
         <key>balance</key><real>12.5</real>\
         <key>tags</key><array><string>a</string><string>b</string></array>\
         <key>home</key><undef/>\
         </map></llsd>"
    );
    assert_eq!(decode(&xml).unwrap(), to_value(&agent).unwrap());
}

#[test]
fn enum_variant_matrix() {
    let cases = vec![
        (Event::Logout, Value::from("Logout")),
        (
            Event::Teleport(Region { x: 1, y: 2 }),
            [("Teleport", [("x", 1), ("y", 2)].into_iter().collect::<Value>())]
                .into_iter()
                .collect(),
        ),
        (
            Event::Chat("hi".into(), 0),
            [(
                "Chat",
                Value::Array(vec![Value::from("hi"), Value::Integer(0)]),
            )]
            .into_iter()
            .collect(),
        ),
        (
            Event::Move { dx: -1, dy: 1 },
            [("Move", [("dx", -1), ("dy", 1)].into_iter().collect::<Value>())]
                .into_iter()
                .collect(),
        ),
    ];
    for (event, expected) in cases {
        assert_eq!(to_value(&event).unwrap(), expected);
    }
}

#[test]
fn newtype_and_tuple_shapes() {
    assert_eq!(to_value(&Handle(7)).unwrap(), Value::Integer(7));
    assert_eq!(
        to_value(&(1, "two", 3.0)).unwrap(),
        Value::Array(vec![Value::Integer(1), Value::from("two"), Value::Real(3.0)])
    );
    assert_eq!(to_value(&Vec::<i32>::new()).unwrap(), Value::Array(vec![]));
    assert_eq!(
        to_value(&BTreeMap::<String, i32>::new()).unwrap(),
        Value::Map(Map::new())
    );
}

#[test]
fn unsupported_types_fail_without_output() {
    let mut bad_keys = BTreeMap::new();
    bad_keys.insert((1, 2), "tuple key");
    let err = to_xml(&bad_keys).unwrap_err();
    assert_eq!(
        err,
        LlsdError::UnsupportedType("map key of kind `array`".into())
    );
    assert!(err.to_string().contains("cannot be serialized into LLSD"));

    let nested = vec![vec![1u128], vec![u128::MAX]];
    assert!(matches!(
        to_xml(&nested),
        Err(LlsdError::UnsupportedType(kind)) if kind == format!("u128 value {}", u128::MAX)
    ));
}

#[test]
fn value_into_json_through_serde() {
    let value: Value = [
        ("bin", Value::Binary(b"hi".to_vec())),
        ("when", Value::epoch()),
        ("none", Value::Undefined),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        serde_json::to_string(&value).unwrap(),
        r#"{"bin":"aGk=","when":"1970-01-01T00:00:00Z","none":null}"#
    );
}

#[derive(Serialize)]
struct Envelope {
    id: Value,
    when: Value,
    link: Value,
    blob: Value,
}

#[test]
fn embedded_values_keep_their_wire_type() {
    let envelope = Envelope {
        id: Value::nil_uuid(),
        when: Value::epoch(),
        link: Value::Uri(Some("http://x/".into())),
        blob: Value::Binary(b"hi".to_vec()),
    };
    assert_eq!(
        to_xml(&envelope).unwrap(),
        "<llsd><map>\
         <key>id</key><uuid>00000000-0000-0000-0000-000000000000</uuid>\
         <key>when</key><date>1970-01-01T00:00:00Z</date>\
         <key>link</key><uri>http://x/</uri>\
         <key>blob</key><binary>aGk=</binary>\
         </map></llsd>"
    );
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "when": "1970-01-01T00:00:00Z",
            "link": "http://x/",
            "blob": "aGk=",
        })
    );
}
