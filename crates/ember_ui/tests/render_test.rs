//! Integration tests for layouts, drawing, behaviours and templates.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use ember_shared::{Colour, Vec2};
use ember_ui::drawable::TextureDrawable;
use ember_ui::layout::{GridLayout, ListLayout};
use ember_ui::render::{FixedScreen, Rect, TextureId};
use ember_ui::{
    Behaviour, RecordingRenderer, RenderCommand, TextureInfo, UiError, WidgetId, WidgetTree,
};

fn textures() -> HashMap<String, TextureInfo> {
    HashMap::from([("icon".to_string(), TextureInfo::new(TextureId(1), Vec2::new(16.0, 16.0)))])
}

fn textured(tree: &mut WidgetTree, parent: WidgetId, size: Vec2) -> WidgetId {
    let widget = tree.create_widget();
    tree.set_absolute_size(widget, size).unwrap();
    tree.set_drawable(widget, Some(Box::new(TextureDrawable::new(textures()["icon"]))))
        .unwrap();
    tree.add_widget(parent, widget).unwrap();
    widget
}

#[test]
fn test_grid_places_children_in_cells() {
    let mut tree = WidgetTree::new();
    let canvas = tree.create_canvas(Vec2::new(200.0, 100.0));
    tree.set_layout(canvas, Some(Box::new(GridLayout::new(2, 2)))).unwrap();

    let cells: Vec<_> = (0..4)
        .map(|_| {
            let child = tree.create_widget();
            tree.set_relative_size(child, Vec2::ONE).unwrap();
            tree.add_widget(canvas, child).unwrap();
            child
        })
        .collect();

    let positions: Vec<_> = cells.iter().map(|&c| tree.final_position(c).unwrap()).collect();
    assert_eq!(
        positions,
        vec![
            Vec2::new(50.0, 75.0),
            Vec2::new(150.0, 75.0),
            Vec2::new(50.0, 25.0),
            Vec2::new(150.0, 25.0),
        ]
    );
    assert_eq!(tree.final_size(cells[3]).unwrap(), Vec2::new(100.0, 50.0));

    // Reordering moves a child into another cell.
    tree.send_to_back(cells[3]).unwrap();
    assert_eq!(tree.final_position(cells[3]).unwrap(), Vec2::new(50.0, 75.0));
    assert_eq!(tree.final_position(cells[0]).unwrap(), Vec2::new(150.0, 75.0));
}

#[test]
fn test_list_tracks_child_count() {
    let mut tree = WidgetTree::new();
    let canvas = tree.create_canvas(Vec2::new(300.0, 100.0));
    tree.set_layout(canvas, Some(Box::new(ListLayout::horizontal()))).unwrap();

    let first = tree.create_widget();
    tree.set_relative_size(first, Vec2::ONE).unwrap();
    tree.add_widget(canvas, first).unwrap();
    assert_eq!(tree.final_size(first).unwrap(), Vec2::new(300.0, 100.0));

    let second = tree.create_widget();
    tree.set_relative_size(second, Vec2::ONE).unwrap();
    tree.add_widget(canvas, second).unwrap();
    assert_eq!(tree.final_size(first).unwrap(), Vec2::new(150.0, 100.0));
    assert_eq!(tree.final_position(second).unwrap(), Vec2::new(225.0, 50.0));

    tree.remove_widget(canvas, first).unwrap();
    assert_eq!(tree.final_size(second).unwrap(), Vec2::new(300.0, 100.0));
}

#[test]
fn test_layout_from_property() {
    let mut tree = WidgetTree::new();
    let canvas = tree.create_canvas(Vec2::new(100.0, 300.0));
    let layout: toml::Table = toml::from_str(r#"Type = "VList""#).unwrap();
    tree.set_property(canvas, "Layout", layout).unwrap();

    let children: Vec<_> = (0..3)
        .map(|_| {
            let child = tree.create_widget();
            tree.set_relative_size(child, Vec2::ONE).unwrap();
            tree.add_widget(canvas, child).unwrap();
            child
        })
        .collect();

    assert_eq!(tree.final_position(children[0]).unwrap(), Vec2::new(50.0, 250.0));
    assert_eq!(tree.final_position(children[2]).unwrap(), Vec2::new(50.0, 50.0));
}

#[test]
fn test_draw_order_and_culling() {
    let mut tree = WidgetTree::new();
    let canvas = tree.create_canvas(Vec2::new(100.0, 100.0));
    let back = textured(&mut tree, canvas, Vec2::new(50.0, 50.0));
    let front = textured(&mut tree, canvas, Vec2::new(10.0, 10.0));
    let offscreen = textured(&mut tree, canvas, Vec2::new(10.0, 10.0));
    tree.set_absolute_position(offscreen, Vec2::new(200.0, 0.0)).unwrap();
    tree.set_colour(front, Colour::RED).unwrap();

    let mut renderer = RecordingRenderer::new();
    tree.draw(canvas, &mut renderer, &FixedScreen(Vec2::new(100.0, 100.0)))
        .unwrap();

    let sizes: Vec<_> = renderer
        .commands()
        .iter()
        .filter_map(|command| match command {
            RenderCommand::Box { size, colour, .. } => Some((*size, *colour)),
            _ => None,
        })
        .collect();
    assert_eq!(
        sizes,
        vec![(Vec2::new(50.0, 50.0), Colour::WHITE), (Vec2::new(10.0, 10.0), Colour::RED)]
    );

    tree.set_visible(back, false).unwrap();
    renderer.begin_frame();
    tree.draw(canvas, &mut renderer, &FixedScreen(Vec2::new(100.0, 100.0)))
        .unwrap();
    assert_eq!(renderer.box_count(), 1);
}

#[test]
fn test_clipping_wraps_children() {
    let mut tree = WidgetTree::new();
    tree.set_texture_source(textures());
    let canvas = tree.create_canvas(Vec2::new(100.0, 100.0));
    let panel = tree.create_widget();
    tree.set_absolute_size(panel, Vec2::new(40.0, 20.0)).unwrap();
    tree.set_clipping_enabled(panel, true).unwrap();
    tree.add_widget(canvas, panel).unwrap();
    let icon = tree.create_widget();
    tree.set_property(
        icon,
        "Drawable",
        toml::from_str::<toml::Table>(r#"Type = "Texture"
TextureLocation = "icon""#)
            .unwrap(),
    )
    .unwrap();
    tree.set_property(icon, "SizePolicy", ember_ui::SizePolicy::UsePreferred)
        .unwrap();
    tree.add_widget(panel, icon).unwrap();

    let mut renderer = RecordingRenderer::new();
    tree.draw(canvas, &mut renderer, &FixedScreen(Vec2::new(100.0, 100.0)))
        .unwrap();

    let commands = renderer.commands();
    assert_eq!(commands.len(), 3);
    assert_eq!(
        commands[0],
        RenderCommand::PushClip {
            bounds: Rect::new(30.0, 40.0, 40.0, 20.0)
        }
    );
    match &commands[1] {
        RenderCommand::Box { size, clip, .. } => {
            assert_eq!(*size, Vec2::new(16.0, 16.0));
            assert_eq!(*clip, Some(Rect::new(30.0, 40.0, 40.0, 20.0)));
        }
        other => panic!("expected a box, got {other:?}"),
    }
    assert_eq!(commands[2], RenderCommand::PopClip);
}

struct Journal(Rc<RefCell<Vec<String>>>);

impl Behaviour for Journal {
    fn on_added_to_canvas(&mut self, tree: &mut WidgetTree, widget: WidgetId) {
        let name = tree.name(widget).unwrap().to_string();
        self.0.borrow_mut().push(format!("added {name}"));
    }

    fn on_removed_from_canvas(&mut self, tree: &mut WidgetTree, widget: WidgetId) {
        let name = tree.name(widget).unwrap().to_string();
        self.0.borrow_mut().push(format!("removed {name}"));
    }

    fn on_update(&mut self, tree: &mut WidgetTree, widget: WidgetId, dt: f32) {
        let name = tree.name(widget).unwrap().to_string();
        self.0.borrow_mut().push(format!("update {name} {dt}"));
    }
}

#[test]
fn test_behaviour_hooks() {
    let journal = Rc::new(RefCell::new(Vec::new()));
    let mut tree = WidgetTree::new();
    let canvas = tree.create_canvas(Vec2::new(100.0, 100.0));
    let parent = tree.create_widget();
    let child = tree.create_widget();
    let internal = tree.create_widget();
    for (widget, name) in [(parent, "parent"), (child, "child"), (internal, "internal")] {
        tree.set_name(widget, name).unwrap();
        tree.set_behaviour(widget, Some(Box::new(Journal(Rc::clone(&journal)))))
            .unwrap();
    }
    tree.add_widget(parent, child).unwrap();
    tree.add_internal_widget(parent, internal).unwrap();
    assert!(journal.borrow().is_empty());

    tree.add_widget(canvas, parent).unwrap();
    tree.update(canvas, 0.5).unwrap();
    tree.remove_from_parent(parent).unwrap();

    assert_eq!(
        *journal.borrow(),
        vec![
            "added child",
            "added internal",
            "added parent",
            "update parent 0.5",
            "update internal 0.5",
            "update child 0.5",
            "removed child",
            "removed internal",
            "removed parent",
        ]
    );
}

struct SelfDestruct;

impl Behaviour for SelfDestruct {
    fn on_update(&mut self, tree: &mut WidgetTree, widget: WidgetId, _dt: f32) {
        tree.destroy(widget).unwrap();
    }
}

#[test]
fn test_update_survives_destruction() {
    let mut tree = WidgetTree::new();
    let canvas = tree.create_canvas(Vec2::new(100.0, 100.0));
    let doomed = tree.create_widget();
    let survivor = tree.create_widget();
    tree.set_behaviour(doomed, Some(Box::new(SelfDestruct))).unwrap();
    tree.add_widget(canvas, doomed).unwrap();
    tree.add_widget(canvas, survivor).unwrap();

    tree.update(canvas, 0.016).unwrap();

    assert!(!tree.contains_widget(doomed));
    assert!(tree.contains_widget(survivor));
    assert_eq!(tree.final_size(doomed), Err(UiError::UnknownWidget(doomed)));
}

struct RunOnce(Rc<Cell<u32>>);

impl Behaviour for RunOnce {
    fn on_update(&mut self, tree: &mut WidgetTree, widget: WidgetId, _dt: f32) {
        self.0.set(self.0.get() + 1);
        tree.set_behaviour(widget, None).unwrap();
    }
}

#[test]
fn test_behaviour_can_remove_itself() {
    let calls = Rc::new(Cell::new(0));
    let mut tree = WidgetTree::new();
    let canvas = tree.create_canvas(Vec2::new(100.0, 100.0));
    let widget = tree.create_widget();
    tree.set_behaviour(widget, Some(Box::new(RunOnce(Rc::clone(&calls))))).unwrap();
    tree.add_widget(canvas, widget).unwrap();

    tree.update(canvas, 0.016).unwrap();
    tree.update(canvas, 0.016).unwrap();

    assert_eq!(calls.get(), 1);
}

/// Destroys a fixed widget when its own widget leaves the canvas.
struct DestroyOnRemoval(WidgetId);

impl Behaviour for DestroyOnRemoval {
    fn on_removed_from_canvas(&mut self, tree: &mut WidgetTree, _widget: WidgetId) {
        tree.destroy(self.0).unwrap();
    }
}

#[test]
fn test_removal_hook_may_destroy_former_parent() {
    let mut tree = WidgetTree::new();
    let canvas = tree.create_canvas(Vec2::new(100.0, 100.0));
    tree.set_layout(canvas, Some(Box::new(ListLayout::horizontal()))).unwrap();
    let parent = tree.create_widget();
    tree.set_layout(parent, Some(Box::new(ListLayout::vertical()))).unwrap();
    tree.add_widget(canvas, parent).unwrap();
    let sibling = tree.create_widget();
    tree.add_widget(parent, sibling).unwrap();
    let child = tree.create_widget();
    tree.set_behaviour(child, Some(Box::new(DestroyOnRemoval(parent)))).unwrap();
    tree.add_widget(parent, child).unwrap();

    tree.remove_from_parent(child).unwrap();

    assert!(!tree.contains_widget(parent));
    assert!(!tree.contains_widget(sibling));
    assert!(tree.contains_widget(child));
    assert_eq!(tree.parent(child).unwrap(), None);
}

#[test]
fn test_template_into_canvas() {
    let mut tree = WidgetTree::new();
    tree.set_texture_source(textures());
    let canvas = tree.create_canvas(Vec2::new(400.0, 100.0));
    let toolbar = tree
        .build_from_toml(
            r#"
            [properties]
            Name = "toolbar"
            RelSize = "1 1"
            Layout = { Type = "Grid", NumRows = 1, NumCols = 4, AbsHSpacing = 0 }

            [[children]]
            properties = { Name = "save", RelSize = "1 1", Drawable = { Type = "Texture", TextureLocation = "icon" } }

            [[children]]
            properties = { Name = "load", RelSize = "1 1", Drawable = { Type = "Texture", TextureLocation = "icon" } }
            "#,
        )
        .unwrap();
    tree.add_widget(canvas, toolbar).unwrap();

    let load = tree.get_widget(toolbar, "load").unwrap().unwrap();
    assert_eq!(tree.final_size(load).unwrap(), Vec2::new(100.0, 100.0));
    assert_eq!(tree.final_position(load).unwrap(), Vec2::new(150.0, 50.0));

    let mut renderer = RecordingRenderer::new();
    tree.draw(canvas, &mut renderer, &FixedScreen(Vec2::new(400.0, 100.0)))
        .unwrap();
    assert_eq!(renderer.box_count(), 2);
}
