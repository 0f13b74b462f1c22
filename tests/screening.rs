use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use price_screener::logging::init_logging;
use price_screener::{
    catalog, CaptureLayout, DocumentFetcher, FetchError, Page, ProductType, ProductTypeRule, ProviderInfo,
    Screener, ScreenerConfig,
};
use rust_decimal::Decimal;

/// Canned responses per URL; anything else times out
#[derive(Default)]
struct FakeFetcher {
    pages: HashMap<String, Result<String, u16>>,
}

impl FakeFetcher {
    fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), Err(status));
        self
    }
}

#[async_trait]
impl DocumentFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        match self.pages.get(url) {
            Some(Ok(body)) => Ok(Page {
                url: url.to_string(),
                body: body.clone(),
            }),
            Some(Err(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
        }
    }
}

const SE_PAGE: &str = r#"
<html><body>
<ul id="se">
    <li>iPhone SE</li>
    <li>iPhone SE 64Gb, Space Gray, <span>$399</span></li>
    <li>iPhone SE 128Gb, Silver, <span>$449</span></li>
</ul>
</body></html>
"#;

fn se_rule() -> ProductTypeRule {
    ProductTypeRule::new(ProductType::IphoneSe, "ul#se > li", r"(iPhone SE).(\d+Gb),(.*),(.*)")
        .with_group_header()
        .layout(CaptureLayout {
            title: vec![0, 1],
            description: None,
            parameters: Some(1),
        })
}

fn shared_page_config(url: &str) -> price_screener::ProviderConfig {
    price_screener::ProviderConfig {
        info: ProviderInfo::new("Shop", url),
        navigation: price_screener::Navigation::SharedPage,
        fetcher: Default::default(),
        rules: vec![se_rule()],
    }
}

#[tokio::test]
async fn iphone_se_page_yields_one_product_per_row() {
    init_logging("debug");

    let config = shared_page_config("http://shop.test");
    let provider = config
        .build_with_fetcher(Arc::new(FakeFetcher::default().page("http://shop.test", SE_PAGE)))
        .unwrap();
    let screener = Screener::new().with_provider(config.info.clone(), provider);

    let products = screener.providers()[0].screen_one(ProductType::IphoneSe).await;
    assert_eq!(products.len(), 2);

    assert_eq!(products[0].title, "iPhone SE 64Gb");
    assert_eq!(products[0].description, "iPhone SE");
    assert_eq!(products[0].price, Some(Decimal::from_str("399.00").unwrap()));
    assert_eq!(products[0].parameters, "storage=64Gb");
    assert_eq!(products[0].product_type, ProductType::IphoneSe);

    assert_eq!(products[1].title, "iPhone SE 128Gb");
    assert_eq!(products[1].description, "iPhone SE");
    assert_eq!(products[1].price, Some(Decimal::from(449)));
    assert_eq!(products[1].parameters, "storage=128Gb");
}

#[tokio::test]
async fn failed_query_page_does_not_block_other_types() {
    let mut config = catalog::citilink_spb();
    config.info.url = "http://citilink.test".to_string();
    let se = config.rules[0].clone();
    config.rules.push(
        ProductTypeRule::new(ProductType::IphoneX, se.item_selector.clone(), r"(iPhone X).(\d+Gb),(.*),(.*)")
            .query("iphone X")
            .source(se.source)
            .layout(se.layout),
    );

    let listing = r#"
    <div id="subcategoryList"><div><div>
        <div data-params='{"shortName": "iPhone SE 32Gb, Gold, MP842RU/A", "price": 19990}'>iPhone SE 32Gb</div>
    </div></div></div>
    "#;
    let fetcher = FakeFetcher::default()
        .status(
            "http://citilink.test/search/?menu_id=100008&text=iphone+X&available=1",
            503,
        )
        .page(
            "http://citilink.test/search/?menu_id=100008&text=iphone+SE&available=1",
            listing,
        );

    let provider = config.build_with_fetcher(Arc::new(fetcher)).unwrap();
    let screener = Screener::new().with_provider(config.info.clone(), provider);

    let products = screener.providers()[0]
        .screening(&[ProductType::IphoneX, ProductType::IphoneSe])
        .await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "iPhone SE 32Gb");
    assert_eq!(products[0].description, "MP842RU/A");
    assert_eq!(products[0].price, Some(Decimal::from(19990)));
}

#[tokio::test]
async fn unregistered_type_does_not_affect_others() {
    let config = shared_page_config("http://shop.test");
    let provider = config
        .build_with_fetcher(Arc::new(FakeFetcher::default().page("http://shop.test", SE_PAGE)))
        .unwrap();
    let handle = Screener::new().with_provider(config.info.clone(), provider).providers()[0].clone();

    assert!(handle.screen_one(ProductType::IphoneXsMax).await.is_empty());
    let mixed = handle
        .screening(&[ProductType::IphoneXsMax, ProductType::IphoneSe, ProductType::Iphone6s])
        .await;
    assert_eq!(mixed.len(), 2);
    assert!(mixed.iter().all(|p| p.product_type == ProductType::IphoneSe));
}

#[tokio::test]
async fn providers_are_screened_independently() {
    let up = shared_page_config("http://up.test");
    let mut down = shared_page_config("http://down.test");
    down.info.title = "Down".to_string();

    let fetcher = Arc::new(FakeFetcher::default().page("http://up.test", SE_PAGE));
    let screener = Screener::new()
        .with_provider(down.info.clone(), down.build_with_fetcher(fetcher.clone()).unwrap())
        .with_provider(up.info.clone(), up.build_with_fetcher(fetcher).unwrap());

    let screening = screener.screen_providers(&ProductType::ALL).await;
    assert_eq!(screening.results[0].provider, "Down");
    assert!(screening.results[0].products.is_empty());
    assert_eq!(screening.results[1].provider, "Shop");
    assert_eq!(screening.len(), 2);

    let json = serde_json::to_value(&screening).unwrap();
    assert_eq!(json["results"][1]["products"][0]["product_type"], "IPHONE_SE");
}

#[test]
fn builtin_catalog_builds_from_json_round_trip() {
    let config = ScreenerConfig {
        providers: catalog::all(),
    };
    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed = ScreenerConfig::from_json(&json).unwrap();

    let screener = Screener::from_config(&parsed).unwrap();
    assert_eq!(screener.providers().len(), 2);
    let aj = screener.provider(catalog::AJ_TITLE).unwrap();
    assert_eq!(aj.provider().rules().len(), ProductType::ALL.len());
}
