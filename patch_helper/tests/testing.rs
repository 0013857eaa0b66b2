use patch_helper::*;

#[derive(Patch, Clone)]
#[patch_attrs(#[derive(Debug, Default, Clone)])]
struct Story {
    #[no_patch]
    id: String,
    name: String,
    read: bool,
}

#[test]
fn patch_applies_present_fields() {
    let mut story = Story {
        id: "test".into(),
        name: "test".into(),
        read: false,
    };

    let patch = Story::patch().with_name("test2".into());

    assert_eq!(story.name, String::from("test"));
    patch.update(&mut story);

    assert_eq!(story.name, String::from("test2"));
    assert_eq!(story.id, String::from("test"));
    assert!(!story.read);
}

#[test]
fn empty_patch_is_noop() {
    let mut story = Story {
        id: "test".into(),
        name: "test".into(),
        read: true,
    };

    story.update(StoryPatch::new());

    assert_eq!(story.name, String::from("test"));
    assert!(story.read);
}

#[test]
fn excluded_fields_have_no_setter() {
    // StoryPatch only mirrors name and read; id stays store-owned.
    let patch = StoryPatch::new().with_read(false);
    assert_eq!(patch.read, Some(false));
    assert!(patch.name.is_none());
}
