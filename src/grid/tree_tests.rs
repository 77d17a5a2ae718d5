#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::tree::{CategoryPath, PARENT_PROMPT};
use super::*;
use crate::models::{CategoryId, CategoryKind, CellValue, Level, Month};

pub(super) fn month(s: &str) -> Month {
    s.parse().unwrap()
}

pub(super) fn id_of(tree: &CategoryTree, name: &str) -> CategoryId {
    tree.walk()
        .into_iter()
        .find(|c| c.name == name)
        .map(|c| c.id)
        .unwrap()
}

/// One income root holding a parent `P{n}` per entry of `parents`, each with
/// the given leaves. Every list ends in its placeholder.
pub(super) fn synthetic(months: usize, parents: &[&[&str]]) -> CategoryTree {
    let mut tree = CategoryTree::empty(months);
    let mut root = tree.create_category("INCOME", CategoryKind::Income, Level::Root, false);
    for (n, leaves) in parents.iter().enumerate() {
        let mut parent =
            tree.create_category(format!("P{n}"), CategoryKind::Income, Level::Parent, false);
        for name in leaves.iter() {
            let leaf = tree.create_category(*name, CategoryKind::Income, Level::Leaf, false);
            parent.sub_categories.push(leaf);
        }
        let placeholder = tree.placeholder_for(&parent);
        parent.sub_categories.push(placeholder);
        root.sub_categories.push(parent);
    }
    let placeholder = tree.placeholder_for(&root);
    root.sub_categories.push(placeholder);
    tree.push_root(root);
    tree
}

// ── MonthSequence ─────────────────────────────────────────────

#[test]
fn test_generate_inclusive() {
    let seq = months::generate(month("2024-01"), month("2024-03"));
    assert_eq!(seq.len(), 3);
    assert_eq!(seq[0], month("2024-01"));
    assert_eq!(seq[2], month("2024-03"));
}

#[test]
fn test_generate_full_year() {
    let seq = months::generate(month("2024-01"), month("2024-12"));
    assert_eq!(seq.len(), 12);
}

#[test]
fn test_generate_across_year_boundary() {
    let seq = months::generate(month("2023-11"), month("2024-02"));
    let keys: Vec<String> = seq.iter().map(Month::key).collect();
    assert_eq!(keys, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
}

#[test]
fn test_generate_single_month() {
    let seq = months::generate(month("2024-05"), month("2024-05"));
    assert_eq!(seq, vec![month("2024-05")]);
}

#[test]
fn test_generate_inverted_range_is_empty() {
    assert!(months::generate(month("2024-03"), month("2024-01")).is_empty());
}

// ── Seeded hierarchy ──────────────────────────────────────────

#[test]
fn test_seeded_shape() {
    let tree = CategoryTree::seeded(3);
    assert!(tree.check_invariants().is_ok());
    assert_eq!(tree.roots().len(), 2);
    assert_eq!(tree.roots()[0].kind, CategoryKind::Income);
    assert_eq!(tree.roots()[1].kind, CategoryKind::Expense);

    for root in tree.roots() {
        assert_eq!(root.sub_categories.len(), 3);
        let last = root.sub_categories.last().unwrap();
        assert!(last.is_placeholder);
        assert_eq!(last.name, PARENT_PROMPT);
        for parent in root.real_children() {
            assert_eq!(parent.sub_categories.len(), 3);
            assert!(parent.sub_categories[2].is_placeholder);
            assert!(parent.cells.is_empty());
        }
    }
}

#[test]
fn test_seeded_leaf_prompt_names_parent() {
    let tree = CategoryTree::seeded(1);
    let general = &tree.roots()[0].sub_categories[0];
    assert_eq!(general.name, "General Income");
    assert_eq!(
        general.sub_categories.last().unwrap().name,
        "Add new General Income category"
    );
}

#[test]
fn test_seeded_ids_unique() {
    let tree = CategoryTree::seeded(2);
    let mut ids: Vec<CategoryId> = tree.walk().iter().map(|c| c.id).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

// ── create_category ───────────────────────────────────────────

#[test]
fn test_create_leaf_sizing() {
    let mut tree = CategoryTree::empty(12);
    let leaf = tree.create_category("Rent", CategoryKind::Expense, Level::Leaf, false);
    assert_eq!(leaf.cells.len(), 13);
    assert_eq!(leaf.subtotals.len(), 13);
    assert_eq!(leaf.cells[0].value, CellValue::Label("Rent".into()));
    assert!(!leaf.cells[0].focusable);
    assert!(leaf.cells[1..].iter().all(|c| c.focusable && c.editable));
    assert!(leaf.subtotals.iter().all(|v| v.is_zero()));
}

#[test]
fn test_create_placeholder_leaf_only_label_focusable() {
    let mut tree = CategoryTree::empty(3);
    let ph = tree.create_category("Add new", CategoryKind::Income, Level::Leaf, true);
    assert_eq!(ph.cells.len(), 4);
    assert!(ph.cells[0].focusable && ph.cells[0].editable);
    assert!(ph.cells[1..].iter().all(|c| !c.focusable && !c.editable));
}

#[test]
fn test_create_parent_has_no_cells() {
    let mut tree = CategoryTree::empty(3);
    let parent = tree.create_category("Group", CategoryKind::Income, Level::Parent, false);
    assert!(parent.cells.is_empty());
    assert_eq!(parent.subtotals.len(), 4);

    let ph = tree.create_category(PARENT_PROMPT, CategoryKind::Income, Level::Parent, true);
    assert_eq!(ph.cells.len(), 1);
}

#[test]
fn test_create_allocates_fresh_ids() {
    let mut tree = CategoryTree::empty(1);
    let a = tree.create_category("a", CategoryKind::Income, Level::Leaf, false);
    let b = tree.create_category("a", CategoryKind::Income, Level::Leaf, false);
    assert_ne!(a.id, b.id);
}

// ── find_path ─────────────────────────────────────────────────

#[test]
fn test_find_path_each_level() {
    let tree = CategoryTree::seeded(3);
    let root = tree.find_path(id_of(&tree, "EXPENSES")).unwrap();
    assert_eq!(root.level(), Level::Root);
    assert_eq!(root.root, 1);

    let parent = tree.find_path(id_of(&tree, "Other Income")).unwrap();
    assert_eq!(parent.level(), Level::Parent);
    assert_eq!(parent.parent, Some(1));

    let leaf = tree.find_path(id_of(&tree, "Cloud Hosting")).unwrap();
    assert_eq!(
        leaf,
        CategoryPath {
            root: 1,
            parent: Some(0),
            leaf: Some(1)
        }
    );
    assert_eq!(tree.get(leaf).unwrap().name, "Cloud Hosting");
}

#[test]
fn test_find_path_not_found() {
    let tree = CategoryTree::seeded(3);
    assert!(tree.find_path(CategoryId(9999)).is_none());
    assert!(tree.find(CategoryId(9999)).is_none());
}

#[test]
fn test_owner_of() {
    let tree = CategoryTree::seeded(3);
    let sales = id_of(&tree, "Sales");
    assert_eq!(tree.owner_of(sales), Some(id_of(&tree, "General Income")));
    assert_eq!(
        tree.owner_of(id_of(&tree, "General Income")),
        Some(id_of(&tree, "INCOME"))
    );
    assert_eq!(tree.owner_of(id_of(&tree, "INCOME")), None);
}

// ── write_cell ────────────────────────────────────────────────

#[test]
fn test_write_cell_updates_chain() {
    let mut tree = CategoryTree::seeded(3);
    let sales = id_of(&tree, "Sales");
    let training = id_of(&tree, "Training");
    tree.write_cell(sales, 0, dec!(100)).unwrap();
    tree.write_cell(sales, 2, dec!(300)).unwrap();
    tree.write_cell(training, 0, dec!(50)).unwrap();

    let sales_cat = tree.find(sales).unwrap();
    assert_eq!(sales_cat.month_values(), vec![dec!(100), dec!(0), dec!(300)]);
    assert_eq!(sales_cat.aggregate(), dec!(400));

    let general = tree.find(id_of(&tree, "General Income")).unwrap();
    assert_eq!(general.subtotals, vec![dec!(100), dec!(0), dec!(300), dec!(400)]);

    let income = &tree.roots()[0];
    assert_eq!(income.subtotals, vec![dec!(150), dec!(0), dec!(300), dec!(450)]);

    // Expense side untouched
    assert!(tree.roots()[1].subtotals.iter().all(|v| v.is_zero()));
}

#[test]
fn test_write_cell_overwrites() {
    let mut tree = CategoryTree::seeded(1);
    let sales = id_of(&tree, "Sales");
    tree.write_cell(sales, 0, dec!(10)).unwrap();
    tree.write_cell(sales, 0, dec!(-2.5)).unwrap();
    assert_eq!(tree.roots()[0].subtotals[0], dec!(-2.5));
}

#[test]
fn test_write_cell_rejects_placeholder() {
    let mut tree = CategoryTree::seeded(3);
    let ph = tree.roots()[0].sub_categories[0].sub_categories[2].id;
    assert_eq!(
        tree.write_cell(ph, 0, dec!(5)),
        Err(GridError::Placeholder(ph))
    );
    assert!(tree.find(ph).unwrap().month_values().iter().all(|v| v.is_zero()));
    assert!(tree.roots()[0].subtotals.iter().all(|v| v.is_zero()));
}

#[test]
fn test_write_cell_rejects_parent_and_bad_month() {
    let mut tree = CategoryTree::seeded(3);
    let general = id_of(&tree, "General Income");
    assert_eq!(
        tree.write_cell(general, 0, dec!(1)),
        Err(GridError::NotALeaf(general))
    );
    let sales = id_of(&tree, "Sales");
    assert_eq!(
        tree.write_cell(sales, 3, dec!(1)),
        Err(GridError::MonthOutOfRange {
            month: 3,
            months: 3
        })
    );
}

#[test]
fn test_write_cell_unknown_id() {
    let mut tree = CategoryTree::seeded(3);
    let missing = CategoryId(4242);
    assert_eq!(
        tree.write_cell(missing, 0, dec!(1)),
        Err(GridError::NotFound(missing))
    );
}

// ── edit_label ────────────────────────────────────────────────

#[test]
fn test_edit_label_on_placeholder() {
    let mut tree = CategoryTree::seeded(3);
    let ph = tree.roots()[1].sub_categories[2].id;
    tree.edit_label(ph, "Taxes").unwrap();
    let cat = tree.find(ph).unwrap();
    assert_eq!(cat.display_label(), "Taxes");
    assert_eq!(cat.name, PARENT_PROMPT);
}

#[test]
fn test_edit_label_locked_on_real_rows() {
    let mut tree = CategoryTree::seeded(3);
    let sales = id_of(&tree, "Sales");
    assert_eq!(tree.edit_label(sales, "x"), Err(GridError::LabelLocked(sales)));
    let general = id_of(&tree, "General Income");
    assert_eq!(
        tree.edit_label(general, "x"),
        Err(GridError::LabelLocked(general))
    );
    assert_eq!(tree.find(sales).unwrap().display_label(), "Sales");
}

// ── resize ────────────────────────────────────────────────────

#[test]
fn test_resize_keeps_structure_resets_values() {
    let mut tree = CategoryTree::seeded(3);
    let sales = id_of(&tree, "Sales");
    tree.write_cell(sales, 1, dec!(75)).unwrap();
    let rows_before = tree.walk().len();

    tree.resize(6);
    assert_eq!(tree.months_count(), 6);
    assert_eq!(tree.walk().len(), rows_before);
    assert!(tree.check_invariants().is_ok());

    let sales_cat = tree.find(sales).unwrap();
    assert_eq!(sales_cat.cells.len(), 7);
    assert!(sales_cat.month_values().iter().all(|v| v.is_zero()));
    assert!(tree.roots()[0].subtotals.iter().all(|v| v.is_zero()));
}

#[test]
fn test_resize_to_zero_months() {
    let mut tree = CategoryTree::seeded(3);
    tree.resize(0);
    assert!(tree.check_invariants().is_ok());
    let sales = tree.find(id_of(&tree, "Sales")).unwrap();
    assert_eq!(sales.cells.len(), 1);
    assert_eq!(sales.subtotals, vec![Decimal::ZERO]);
}

#[test]
fn test_resize_keeps_typed_placeholder_label() {
    let mut tree = CategoryTree::seeded(2);
    let ph = tree.roots()[0].sub_categories[0].sub_categories[2].id;
    tree.edit_label(ph, "Royalties").unwrap();
    tree.resize(4);
    let cat = tree.find(ph).unwrap();
    assert_eq!(cat.display_label(), "Royalties");
    assert!(cat.cells[1..].iter().all(|c| !c.focusable));
}

// ── check_invariants ──────────────────────────────────────────

#[test]
fn test_invariant_placeholder_not_last() {
    let mut tree = CategoryTree::seeded(2);
    tree.roots_mut()[0].sub_categories[0].sub_categories.swap(1, 2);
    assert!(matches!(
        tree.check_invariants(),
        Err(GridError::Invariant(_))
    ));
}

#[test]
fn test_invariant_two_placeholders() {
    let mut tree = CategoryTree::seeded(2);
    let parent = tree.roots()[0].sub_categories[0].clone();
    let extra = tree.placeholder_for(&parent);
    tree.roots_mut()[0].sub_categories[0]
        .sub_categories
        .insert(0, extra);
    assert!(tree.check_invariants().is_err());
}

#[test]
fn test_invariant_missing_placeholder() {
    let mut tree = CategoryTree::seeded(2);
    tree.roots_mut()[1].sub_categories.pop();
    assert!(tree.check_invariants().is_err());
}

#[test]
fn test_invariant_cell_count() {
    let mut tree = CategoryTree::seeded(2);
    tree.roots_mut()[0].sub_categories[0].sub_categories[0]
        .cells
        .pop();
    assert!(tree.check_invariants().is_err());
}

// ── Subtotal property over synthetic trees ────────────────────

#[test]
fn test_subtotals_equal_sum_of_children_for_varied_shapes() {
    let names = ["a", "b", "c", "d", "e"];
    for width in 1..=4 {
        for leaves in 0..=names.len() {
            let shape: Vec<&[&str]> = (0..width).map(|_| &names[..leaves]).collect();
            let mut tree = synthetic(4, &shape);
            assert!(tree.check_invariants().is_ok());

            // Write a distinct value into every leaf/month.
            let leaf_ids: Vec<CategoryId> = tree
                .walk()
                .into_iter()
                .filter(|c| c.is_leaf() && !c.is_placeholder)
                .map(|c| c.id)
                .collect();
            for (k, id) in leaf_ids.iter().enumerate() {
                for m in 0..4 {
                    let v = Decimal::from((k * 10 + m) as i64);
                    tree.write_cell(*id, m, v).unwrap();
                }
            }

            let root = &tree.roots()[0];
            for m in 0..4 {
                let mut root_sum = Decimal::ZERO;
                for parent in root.real_children() {
                    let expected: Decimal =
                        parent.real_children().map(|l| l.month_value(m)).sum();
                    assert_eq!(parent.subtotals[m], expected);
                    root_sum += expected;
                }
                assert_eq!(root.subtotals[m], root_sum);
            }
            let total: Decimal = root.subtotals[..4].iter().sum();
            assert_eq!(root.aggregate(), total);
        }
    }
}
