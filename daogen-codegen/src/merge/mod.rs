use std::collections::{HashMap, HashSet};

use prettyplease::unparse;
use syn::fold::{self, Fold};
use syn::{
    Attribute, Fields, Ident, Item, ItemUse, Meta, Path, Token, parse::Parser, parse_file,
    punctuated::Punctuated,
};
use tracing::debug;

use crate::Error;

mod extract;
use extract::*;

/// Derives owned by the serde option of the current run
const SERDE_DERIVES: [&str; 2] = ["Serialize", "Deserialize"];

/// Attributes a previous version of the file put on generated items
#[derive(Default)]
struct OldIndex<'a> {
    model_attrs: &'a [Attribute],
    model_field_attrs: HashMap<&'a Ident, &'a [Attribute]>,

    enum_attrs: HashMap<String, &'a [Attribute]>,
    variant_attrs: HashMap<(String, &'a Ident), &'a [Attribute]>,
}

impl<'a> OldIndex<'a> {
    fn from_file(file: &'a syn::File) -> OldIndex<'a> {
        let mut idx = OldIndex::default();

        if let Some(model) = find_model_struct(file) {
            idx.model_attrs = &model.attrs;
            if let Fields::Named(named) = &model.fields {
                for field in &named.named {
                    if let Some(ident) = &field.ident {
                        idx.model_field_attrs.insert(ident, &field.attrs);
                    }
                }
            }
        }

        for name in ["Column", "Relation"] {
            if let Some(item_enum) = find_enum(file, name) {
                idx.enum_attrs.insert(name.to_owned(), &item_enum.attrs);
                for variant in &item_enum.variants {
                    idx.variant_attrs
                        .insert((name.to_owned(), &variant.ident), &variant.attrs);
                }
            }
        }

        idx
    }
}

struct KeepSections<'a> {
    old: OldIndex<'a>,
    seen_use: HashSet<ItemUse>,
    extra_uses: Vec<&'a ItemUse>,
    kept_items: Vec<&'a Item>,
}

impl<'a> KeepSections<'a> {
    fn new(old_file: &'a syn::File) -> Self {
        Self {
            old: OldIndex::from_file(old_file),
            seen_use: HashSet::new(),
            extra_uses: extract_top_level_uses(old_file).collect(),
            kept_items: extract_kept_items(old_file).collect(),
        }
    }
}

impl Fold for KeepSections<'_> {
    fn fold_item_struct(&mut self, i: syn::ItemStruct) -> syn::ItemStruct {
        let mut i = fold::fold_item_struct(self, i);
        if i.ident == "Model" {
            merge_item_attributes(&mut i.attrs, self.old.model_attrs);
            if let Fields::Named(named) = &mut i.fields {
                for field in &mut named.named {
                    let old_attrs = field
                        .ident
                        .as_ref()
                        .and_then(|ident| self.old.model_field_attrs.get(ident));
                    if let Some(old_attrs) = old_attrs {
                        merge_item_attributes(&mut field.attrs, old_attrs);
                    }
                }
            }
        }
        i
    }

    fn fold_item_enum(&mut self, i: syn::ItemEnum) -> syn::ItemEnum {
        let mut i = fold::fold_item_enum(self, i);
        let name = i.ident.to_string();
        if let Some(old_attrs) = self.old.enum_attrs.get(&name) {
            merge_item_attributes(&mut i.attrs, old_attrs);
            for variant in &mut i.variants {
                let key = (name.clone(), &variant.ident);
                if let Some(old_attrs) = self.old.variant_attrs.get(&key) {
                    merge_item_attributes(&mut variant.attrs, old_attrs);
                }
            }
        }
        i
    }

    fn fold_file(&mut self, mut file: syn::File) -> syn::File {
        let mut uses: Vec<Item> = Vec::new();
        let mut others: Vec<Item> = Vec::new();

        for item in file.items {
            match item {
                Item::Use(u) => {
                    if self.seen_use.insert(u.clone()) {
                        uses.push(Item::Use(u));
                    }
                }
                other => others.push(fold::fold_item(self, other)),
            }
        }

        for &u in &self.extra_uses {
            if self.seen_use.insert(u.clone()) {
                uses.push(Item::Use(u.clone()));
            }
        }

        for &item in &self.kept_items {
            others.push(item.clone());
        }

        uses.extend(others);
        file.items = uses;
        file
    }
}

/// Regenerate an entity file while keeping its hand-written sections.
///
/// Items of `old_src` the generator does not produce (imports, `impl`
/// blocks, helper functions, consts and types) are appended after the
/// generated items of `new_src`. Attributes and doc comments added to the
/// generated `Model`, `Column` and `Relation` items are carried over; on a
/// conflicting attribute key the old value wins.
pub fn merge_entity_file(old_src: &str, new_src: &str) -> Result<String, Error> {
    let new_file = parse_file(new_src)?;
    let old_file = parse_file(old_src)?;

    let mut folder = KeepSections::new(&old_file);
    debug!(
        "Keeping {} item(s) and {} import(s) of the existing file",
        folder.kept_items.len(),
        folder.extra_uses.len()
    );
    let merged_file = folder.fold_file(new_file);

    Ok(render_file_with_spacing(merged_file))
}

/// Output for an existing file that could not be parsed: the new content,
/// followed by the old content in a block comment.
pub fn preserve_old_content(old_src: &str, new_src: &str) -> String {
    let mut appended = String::from(new_src);
    if !appended.ends_with('\n') {
        appended.push('\n');
    }
    appended.push('\n');
    appended.push_str("// --- Previous file content (could not be merged automatically) ---\n");
    appended.push_str("/*\n");
    appended.push_str(old_src);
    if !old_src.ends_with('\n') {
        appended.push('\n');
    }
    appended.push_str("*/\n");
    appended
}

fn merge_item_attributes(new_attrs: &mut Vec<Attribute>, old_attrs: &[Attribute]) {
    merge_derives(new_attrs, old_attrs);

    let mut path_idx_map = HashMap::<Path, usize>::new();
    let mut doc_attr_set = HashSet::<Attribute>::new();

    for (idx, attr) in new_attrs.iter().enumerate() {
        if is_doc_attribute(attr) {
            doc_attr_set.insert(attr.clone());
        } else if !attr.path().is_ident("derive") {
            path_idx_map.entry(attr.path().clone()).or_insert(idx);
        }
    }

    for old_attr in old_attrs {
        if old_attr.path().is_ident("derive") {
            continue;
        }

        if is_doc_attribute(old_attr) {
            if doc_attr_set.insert(old_attr.clone()) {
                new_attrs.push(old_attr.clone());
            }
            continue;
        }

        match path_idx_map.get(old_attr.path()) {
            Some(&idx) => {
                if let Some(merged) = merge_non_derive_attribute(old_attr, &new_attrs[idx]) {
                    new_attrs[idx] = merged;
                }
            }
            None => {
                path_idx_map.insert(old_attr.path().clone(), new_attrs.len());
                new_attrs.push(old_attr.clone());
            }
        }
    }
}

fn merge_derives(new_attrs: &mut Vec<Attribute>, old_attrs: &[Attribute]) {
    let mut derive_paths: Vec<Path> = Vec::new();
    let mut seen = HashSet::new();
    let mut insert_index = None;
    let mut idx = 0usize;
    while idx < new_attrs.len() {
        if new_attrs[idx].path().is_ident("derive") {
            insert_index.get_or_insert(idx);
            for path in parse_derive_paths(&new_attrs[idx]).unwrap_or_default() {
                if seen.insert(path.clone()) {
                    derive_paths.push(path);
                }
            }
            new_attrs.remove(idx);
        } else {
            idx += 1;
        }
    }

    let old_derives = old_attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(parse_derive_paths)
        .flatten()
        .filter(|path| !is_serde_derive(path));
    for path in old_derives {
        if seen.insert(path.clone()) {
            derive_paths.push(path);
        }
    }

    if derive_paths.is_empty() {
        return;
    }

    let insert_index = insert_index.unwrap_or_else(|| {
        new_attrs
            .iter()
            .position(|attr| !is_doc_attribute(attr))
            .unwrap_or(new_attrs.len())
    });
    let derive_attr: Attribute = syn::parse_quote!(#[derive(#(#derive_paths),*)]);
    new_attrs.insert(insert_index, derive_attr);
}

fn parse_derive_paths(attr: &Attribute) -> Option<Vec<Path>> {
    attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)
        .ok()
        .map(|punct| punct.into_iter().collect())
}

fn is_serde_derive(path: &Path) -> bool {
    path.segments
        .last()
        .is_some_and(|segment| SERDE_DERIVES.iter().any(|d| segment.ident == d))
}

fn merge_non_derive_attribute(old_attr: &Attribute, new_attr: &Attribute) -> Option<Attribute> {
    let parse_attr = |attr: &Attribute| {
        attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
            .ok()
    };

    let old_args = parse_attr(old_attr)?;
    let new_args = parse_attr(new_attr)?;

    fn meta_key(meta: &Meta) -> &Path {
        match meta {
            Meta::Path(p) => p,
            Meta::NameValue(nv) => &nv.path,
            Meta::List(list) => &list.path,
        }
    }

    let mut seen_keys = HashSet::<Path>::new();
    let mut merged: Vec<Meta> = Vec::new();

    // old values win on key conflict
    for m in old_args.into_iter().chain(new_args) {
        if seen_keys.insert(meta_key(&m).clone()) {
            merged.push(m);
        }
    }

    let path = old_attr.path();
    let tokens = quote::quote!(#[#path(#(#merged),*)]);
    Attribute::parse_outer
        .parse2(tokens)
        .ok()
        .and_then(|v| v.into_iter().next())
}

fn is_doc_attribute(attr: &Attribute) -> bool {
    attr.path().is_ident("doc")
}

/// Render with one blank line between items and none between imports
fn render_file_with_spacing(file: syn::File) -> String {
    fn render_items(items: &[Item], separator: &str) -> Option<String> {
        let rendered_parts: Vec<String> = items
            .iter()
            .map(|item| {
                let single_item_file = syn::File {
                    shebang: None,
                    attrs: Vec::new(),
                    items: vec![item.clone()],
                };
                unparse(&single_item_file)
                    .trim_end_matches(['\n', '\r'])
                    .to_owned()
            })
            .filter(|part| !part.is_empty())
            .collect();
        if rendered_parts.is_empty() {
            None
        } else {
            Some(rendered_parts.join(separator))
        }
    }

    let syn::File { attrs, items, .. } = file;

    let (use_items, other_items): (Vec<Item>, Vec<Item>) =
        items.into_iter().partition(|it| matches!(it, Item::Use(_)));

    let mut out = String::new();

    if !attrs.is_empty() {
        let attrs_file = syn::File {
            shebang: None,
            attrs,
            items: vec![],
        };
        let rendered = unparse(&attrs_file);
        let trimmed = rendered.trim_end_matches(['\n', '\r']);
        if !trimmed.is_empty() {
            out.push_str(trimmed);
            out.push_str("\n\n");
        }
    }

    if let Some(block) = render_items(&use_items, "\n") {
        out.push_str(&block);
        out.push('\n');
    }

    if let Some(block) = render_items(&other_items, "\n\n") {
        if !out.is_empty() && !out.ends_with("\n\n") {
            out.push('\n');
        }
        out.push_str(&block);
        out.push('\n');
    }

    out
}
