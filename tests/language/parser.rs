extern crate fabrix_editor;

use fabrix_editor::language::ast::*;
use fabrix_editor::language::kinds::*;
use fabrix_editor::language::lexer::*;
use fabrix_editor::language::parser::*;
use fabrix_editor::language::printer::print;

use std::fs::File;
use std::io::Read;

fn loc_builder(start: usize, end: usize, source: Option<Source>) -> Option<Location> {
    Some(Location {
        start: start,
        end: end,
        source: source,
    })
}

fn name(value: &str, loc: Option<Location>) -> Name {
    Name {
        loc: loc,
        value: value.to_string(),
    }
}

macro_rules! parse_no_source {
    ($src:expr) => {{
        let source = Source::new($src);
        Parser::parse(source, ParseOptions::no_source())
    }};
}

#[test]
fn it_provides_useful_errors() {
    let mut document;
    document = parse_no_source!("notanoperation Foo { field }");
    let error = document.err().unwrap();
    assert_eq!("Syntax Error: Unexpected Name \"notanoperation\".", error.description);
    assert_eq!((1, 1), (error.line, error.column));

    document = parse_no_source!(
        "
{ ...MissingOn }
fragment MissingOn Type
"
    );
    let error = document.err().unwrap();
    assert_eq!("Syntax Error: Expected \"on\", found Name \"Type\".", error.description);
    assert_eq!((3, 20), (error.line, error.column));

    document = parse_no_source!("{ field: {} }");
    assert_eq!("Syntax Error: Expected Name, found \"{\".", document.err().unwrap().description);

    document = parse_no_source!("{");
    assert_eq!("Syntax Error: Expected Name, found <EOF>.", document.err().unwrap().description);

    document = parse_no_source!("query Foo($a: Int = $b) { f }");
    assert_eq!("Syntax Error: Unexpected \"$\".", document.err().unwrap().description);
}

#[test]
fn it_accepts_option_to_not_include_source() {
    let goal = Document {
        loc: loc_builder(0, 9, None),
        definitions: vec![Definition::Operation(OperationDefinition {
            loc: loc_builder(0, 9, None),
            operation: OperationType::Query,
            name: None,
            variable_definitions: vec![],
            directives: vec![],
            selection_set: SelectionSet {
                loc: loc_builder(0, 9, None),
                selections: vec![Selection::Field(Field {
                    loc: loc_builder(2, 7, None),
                    alias: None,
                    name: name("field", loc_builder(2, 7, None)),
                    arguments: vec![],
                    directives: vec![],
                    selection_set: None,
                })],
            },
        })],
    };

    let source = Source::new("{ field }");
    let document = Parser::parse(source, ParseOptions::no_source());
    assert_eq!(goal, document.ok().unwrap());
}

#[test]
fn it_accepts_option_to_not_include_locations() {
    let document = Parser::parse(Source::new("{ field }"), ParseOptions::no_location()).unwrap();
    assert_eq!(document.loc, None);
    match document.definitions[0] {
        Definition::Operation(ref operation) => assert_eq!(operation.selection_set.loc, None),
        ref other => panic!("unexpected definition {:?}", other),
    }
}

#[test]
fn it_parses_variable_inline_values() {
    let source = Source::new("{ field(complex: { a: { b: [ $var ] } }) }");
    assert!(Parser::parse(source, ParseOptions::new()).is_ok());
}

#[test]
fn it_parses_the_kitchen_sink() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut f = File::open("tests/data/kitchen-sink.graphql").unwrap();
    let mut s = String::new();
    f.read_to_string(&mut s).unwrap();

    let document = Parser::parse(Source::new(s.trim()), ParseOptions::new()).unwrap();
    assert_eq!(document.operations().count(), 5);
    assert_eq!(document.fragments().count(), 1);

    let subscription = document.operation(Some("StoryLikeSubscription")).unwrap();
    assert_eq!(subscription.operation, OperationType::Subscription);
    assert_eq!(subscription.variable_definitions[0].directives[0].name.value, "onVariableDefinition");

    // printing keeps the meaning: the printed text parses to the same tree
    let printed = print(&document);
    let reparsed = Parser::parse(Source::new(&printed), ParseOptions::no_location()).unwrap();
    let original = Parser::parse(Source::new(s.trim()), ParseOptions::no_location()).unwrap();
    assert_eq!(original, reparsed);
}

#[test]
fn it_parsers_creates_ast() {
    let source = Source::new(
        "
{
    node(id: 4) {
        id,
        name
    }
}
",
    );

    let result = Parser::parse(source.clone(), ParseOptions::new());
    let loc = |start, end| loc_builder(start, end, Some(source.clone()));

    let goal = Document {
        loc: loc(1, 54),
        definitions: vec![Definition::Operation(OperationDefinition {
            loc: loc(1, 53),
            operation: OperationType::Query,
            name: None,
            variable_definitions: vec![],
            directives: vec![],
            selection_set: SelectionSet {
                loc: loc(1, 53),
                selections: vec![Selection::Field(Field {
                    loc: loc(7, 51),
                    alias: None,
                    name: name("node", loc(7, 11)),
                    arguments: vec![Argument {
                        loc: loc(12, 17),
                        name: name("id", loc(12, 14)),
                        value: Value::IntValue {
                            loc: loc(16, 17),
                            value: "4".to_string(),
                        },
                    }],
                    directives: vec![],
                    selection_set: Some(SelectionSet {
                        loc: loc(19, 51),
                        selections: vec![
                            Selection::Field(Field {
                                loc: loc(29, 31),
                                alias: None,
                                name: name("id", loc(29, 31)),
                                arguments: vec![],
                                directives: vec![],
                                selection_set: None,
                            }),
                            Selection::Field(Field {
                                loc: loc(41, 45),
                                alias: None,
                                name: name("name", loc(41, 45)),
                                arguments: vec![],
                                directives: vec![],
                                selection_set: None,
                            }),
                        ],
                    }),
                })],
            },
        })],
    };

    assert_eq!(goal, result.ok().unwrap());
}

#[test]
fn it_parses_type_system_definitions_with_descriptions() {
    let document = parse_no_source!(
        r#"
"""
The root
"""
type Query implements Node & Entity {
  "Looks up a user"
  user(id: ID! = "1"): User @deprecated(reason: "use node")
}
"#
    )
    .unwrap();

    match document.definitions[0] {
        Definition::Type(TypeDefinition::Object(ref object)) => {
            assert_eq!(object.description.as_deref(), Some("The root"));
            assert_eq!(object.interfaces.iter().map(|i| i.value.as_str()).collect::<Vec<_>>(), vec!["Node", "Entity"]);
            let field = &object.fields[0];
            assert_eq!(field.description.as_deref(), Some("Looks up a user"));
            assert_eq!(field.arguments[0].value_type.named_type().value, "ID");
            assert_eq!(field.directives[0].name.value, "deprecated");
        }
        ref other => panic!("unexpected definition {:?}", other),
    }
}
