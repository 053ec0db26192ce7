use syn::{File, Item, ItemEnum, ItemImpl, ItemStruct, ItemUse, UseTree};

/// Consts the writer emits into every entity file
const GENERATED_CONSTS: [&str; 2] = ["TABLE_NAME", "PRIMARY_KEY"];
/// Enums whose inherent impls the writer emits
const GENERATED_ENUMS: [&str; 2] = ["Column", "Relation"];

pub(super) fn extract_top_level_uses(file: &File) -> impl Iterator<Item = &ItemUse> {
    file.items.iter().filter_map(|item| match item {
        Item::Use(item_use) if !is_serde_use(item_use) => Some(item_use),
        _ => None,
    })
}

/// Items of an existing file that regeneration would not produce
pub(super) fn extract_kept_items(file: &File) -> impl Iterator<Item = &Item> {
    file.items
        .iter()
        .filter(|item| !matches!(item, Item::Use(_)) && !is_generated_item(item))
}

pub(super) fn find_model_struct(file: &File) -> Option<&ItemStruct> {
    file.items.iter().find_map(|item| match item {
        Item::Struct(item_struct) if item_struct.ident == "Model" => Some(item_struct),
        _ => None,
    })
}

pub(super) fn find_enum<'a>(file: &'a File, name: &str) -> Option<&'a ItemEnum> {
    file.items.iter().find_map(|item| match item {
        Item::Enum(item_enum) if item_enum.ident == name => Some(item_enum),
        _ => None,
    })
}

pub(super) fn is_generated_item(item: &Item) -> bool {
    match item {
        Item::Const(item_const) => GENERATED_CONSTS.iter().any(|c| item_const.ident == c),
        Item::Struct(item_struct) => item_struct.ident == "Model",
        Item::Enum(item_enum) => GENERATED_ENUMS.iter().any(|e| item_enum.ident == e),
        Item::Impl(item_impl) => is_generated_impl(item_impl),
        _ => false,
    }
}

fn is_generated_impl(item_impl: &ItemImpl) -> bool {
    if item_impl.trait_.is_some() {
        return false;
    }
    match item_impl.self_ty.as_ref() {
        syn::Type::Path(type_path) => type_path
            .path
            .get_ident()
            .is_some_and(|ident| GENERATED_ENUMS.iter().any(|e| ident == e)),
        _ => false,
    }
}

/// Serde imports follow the serde option of the current run
pub(super) fn is_serde_use(item_use: &ItemUse) -> bool {
    match &item_use.tree {
        UseTree::Path(path) => path.ident == "serde",
        _ => false,
    }
}
