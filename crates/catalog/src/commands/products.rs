//! Product command handlers.

use tabled::Tabled;

use catalog_core::{
    Catalog, DeleteOutcome, Product, ProductCreate, ProductFilters, ProductId, ProductUpdate,
    SaveTarget,
};

use crate::cli::{CreateArgs, GlobalOpts, ListArgs, ProductsArgs, ProductsCommand, UpdateArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: u32,
    #[tabled(rename = "Rating")]
    rating: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            category: p.category.clone(),
            price: format!("{:.2}", p.price),
            stock: p.stock,
            rating: format!("{:.1}", p.rating),
        }
    }
}

fn detail(p: &Product) -> String {
    let timestamp = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string())
    };
    let or_dash = |s: &str| if s.is_empty() { "-".to_owned() } else { s.to_owned() };

    [
        format!("ID:          {}", p.id),
        format!("Name:        {}", p.name),
        format!("Category:    {}", p.category),
        format!("Price:       {:.2}", p.price),
        format!("Stock:       {}", p.stock),
        format!("Rating:      {:.1}", p.rating),
        format!("Tags:        {}", or_dash(&p.tags.join(", "))),
        format!("Image:       {}", or_dash(&p.image_url)),
        format!("Description: {}", or_dash(&p.description)),
        format!("Created:     {}", timestamp(p.created_at)),
        format!("Updated:     {}", timestamp(p.updated_at)),
    ]
    .join("\n")
}

// ── Arg conversion ──────────────────────────────────────────────────

fn filters_from(args: ListArgs) -> ProductFilters {
    ProductFilters {
        search: args.search,
        category: args.category,
        min_price: args.min_price,
        max_price: args.max_price,
        sort_by: args.sort_by.map(Into::into),
        sort_order: args.sort_order.map(Into::into),
        page: args.page,
        limit: args.limit,
    }
}

fn create_from(args: CreateArgs) -> ProductCreate {
    ProductCreate {
        name: args.name,
        description: args.description,
        price: args.price,
        category: args.category.to_string(),
        image_url: args.image_url,
        stock: args.stock,
        rating: args.rating,
        tags: args.tags,
    }
}

fn update_from(args: UpdateArgs) -> ProductUpdate {
    ProductUpdate {
        name: args.name,
        description: args.description,
        price: args.price,
        category: args.category.map(|c| c.to_string()),
        image_url: args.image_url,
        stock: args.stock,
        rating: args.rating,
        tags: (!args.tags.is_empty()).then_some(args.tags),
    }
}

fn print_product(product: &Product, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, product, detail, |p| p.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    catalog: &Catalog,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = catalog.store();

    match args.command {
        ProductsCommand::List(list) => {
            let products = store.list(&filters_from(list)).await?;
            let out = output::render_list(
                &global.output,
                &products,
                |p| ProductRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);

            if !global.quiet {
                let page = store.page_info();
                eprintln!(
                    "{} of {} products, page {} of {}",
                    products.len(),
                    store.total_count(),
                    page.page,
                    store.total_pages().max(1)
                );
            }
            Ok(())
        }

        ProductsCommand::Get { id } => {
            let product = store.get_by_id(&ProductId::new(id)).await?;
            print_product(&product, global)
        }

        ProductsCommand::Create(fields) => {
            let product = catalog.save(SaveTarget::Create(create_from(fields))).await?;
            print_product(&product, global)?;
            util::print_notifications(catalog, global);
            Ok(())
        }

        ProductsCommand::Update { id, fields } => {
            let target = SaveTarget::Update {
                id: ProductId::new(id),
                changes: update_from(fields),
            };
            let product = catalog.save(target).await?;
            print_product(&product, global)?;
            util::print_notifications(catalog, global);
            Ok(())
        }

        ProductsCommand::Delete { id } => {
            let id = ProductId::new(id);
            let product = store.get_by_id(&id).await?;

            let (outcome, answered) = tokio::join!(
                catalog.request_delete(&id, &product.name),
                util::answer_confirmation(catalog, "products delete", global.yes),
            );
            answered?;

            match outcome {
                DeleteOutcome::Cancelled => {
                    if !global.quiet {
                        eprintln!("Delete cancelled");
                    }
                    Ok(())
                }
                DeleteOutcome::Started(task) => {
                    task.finished().await?;
                    util::print_notifications(catalog, global);
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use crate::cli::{Cli, Command};

    fn products_command(args: &[&str]) -> ProductsCommand {
        let mut argv = vec!["catalog", "products"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Products(p) => p.command,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_flags_become_filters() {
        let ProductsCommand::List(list) = products_command(&[
            "list", "-s", "chair", "--category", "Home", "--sort-by", "price", "--page", "2",
            "-l", "8",
        ]) else {
            panic!("expected list");
        };
        let filters = filters_from(list);
        assert_eq!(filters.search.as_deref(), Some("chair"));
        assert_eq!(filters.sort_by, Some(catalog_core::SortField::Price));
        assert_eq!(filters.sort_order, None);
        assert_eq!(filters.page, Some(2));
        assert_eq!(filters.limit, Some(8));
    }

    #[test]
    fn update_sends_only_given_fields() {
        let ProductsCommand::Update { id, fields } =
            products_command(&["update", "5", "--price", "15"])
        else {
            panic!("expected update");
        };
        assert_eq!(id, "5");
        let changes = update_from(fields);
        assert_eq!(changes.price, Some(15.0));
        assert!(changes.tags.is_none());
        assert!(changes.name.is_none());
    }

    #[test]
    fn create_normalizes_category_case() {
        let ProductsCommand::Create(fields) = products_command(&[
            "create", "--name", "Lamp", "--price", "12.5", "--category", "home", "--tag", "a",
            "--tag", "b",
        ]) else {
            panic!("expected create");
        };
        let data = create_from(fields);
        assert_eq!(data.category, "Home");
        assert_eq!(data.tags, vec!["a".to_owned(), "b".to_owned()]);
    }
}
