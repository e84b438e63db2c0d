use anyhow::Result;
use serde_json::json;

use nutrilog::core::lookup;
use nutrilog::external::OpenFoodFactsClient;
use nutrilog::models::config::Config;
use nutrilog::output;
use nutrilog::output::human;

pub async fn run(query: &str, limit: u32, human_flag: bool) -> Result<()> {
    let config = Config::load()?;
    let source = OpenFoodFactsClient::new(&config.product_source)?;
    let items = lookup::search_foods(&source, query, limit).await?;

    if human_flag {
        println!("{}", human::format_search(&items));
    } else {
        let out = output::success("search", json!({ "query": query, "products": items }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
