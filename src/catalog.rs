//! Built-in retailer configurations

use crate::config::{Navigation, ProviderConfig};
use crate::fetch::FetcherConfig;
use crate::model::{ProductType, ProviderInfo};
use crate::rules::{CaptureLayout, ItemSource, ProductTypeRule, TitleText};

pub const AJ_TITLE: &str = "AJ";
pub const AJ_URL: &str = "https://aj.ru";

pub const CITILINK_SPB_TITLE: &str = "CitilinkSpb";
pub const CITILINK_URL: &str = "http://citilink.ru";

/// One price-list page with a section per model.
///
/// Each section is `article.<model> > ul > li`; the first `li` names the
/// model, the others read like `iPhone 8 64GB Silver руб<span>46 990</span>`
/// where the last three characters of the title text are a currency marker.
pub fn aj() -> ProviderConfig {
    let row = |product_type, section: &str, article: &str, pattern: &str| {
        ProductTypeRule::new(
            product_type,
            format!("li#{section} > article.{article} > ul > li"),
            pattern,
        )
        .source(ItemSource::Inline {
            text: TitleText::FirstTextNode,
            trim_suffix: 3,
        })
        .with_group_header()
    };

    ProviderConfig {
        info: ProviderInfo::new(AJ_TITLE, AJ_URL),
        navigation: Navigation::SharedPage,
        fetcher: FetcherConfig::default(),
        rules: vec![
            row(ProductType::IphoneSe, "iphone5se", "iphone5se", "iPhone SE.*"),
            row(ProductType::Iphone6s, "iphone", "iphone6s", "iPhone 6s.*"),
            row(ProductType::Iphone7, "iphone", "iphone7", "iPhone 7.*").excluding("Plus"),
            row(ProductType::Iphone7Plus, "iphone", "iphone7", "iPhone 7 Plus.*"),
            row(ProductType::Iphone8, "iphone", "iphone8", "iPhone 8.*").excluding("Plus"),
            row(ProductType::Iphone8Plus, "iphone", "iphone8", "iPhone 8 Plus.*"),
            row(ProductType::IphoneX, "iphone", "iphoneX", "iPhone X.*"),
            row(ProductType::IphoneXs, "iphone", "iphoneXS", "iPhone XS.*").excluding("Max"),
            row(ProductType::IphoneXsMax, "iphone", "iphoneXS", "iPhone XS Max.*"),
            row(ProductType::IphoneXr, "iphone", "iphoneXR", "iPhone XR.*"),
        ],
    }
}

/// Site search, one page per model, Saint Petersburg region.
///
/// Items carry a `data-params` JSON object; its `shortName` reads like
/// `iPhone SE 32Gb, Gold, MP842RU/A`; the trailing article code becomes the
/// description.
pub fn citilink_spb() -> ProviderConfig {
    ProviderConfig {
        info: ProviderInfo::new(CITILINK_SPB_TITLE, CITILINK_URL),
        navigation: Navigation::QueryPage {
            query_path: "/search/?menu_id=100008&text={query}&available=1".to_string(),
        },
        fetcher: FetcherConfig::default().header("_space", "spb_cl%3A"),
        rules: vec![ProductTypeRule::new(
            ProductType::IphoneSe,
            "#subcategoryList > div > div > div",
            r"(iPhone SE).(\d+Gb),(.*),(.*)",
        )
        .query("iphone SE")
        .source(ItemSource::DataAttribute {
            attribute: "data-params".to_string(),
            name_field: "shortName".to_string(),
            price_field: "price".to_string(),
        })
        .layout(CaptureLayout {
            title: vec![0, 1],
            description: Some(3),
            parameters: Some(1),
        })],
    }
}

/// Every built-in retailer
pub fn all() -> Vec<ProviderConfig> {
    vec![aj(), citilink_spb()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::extract_page;
    use crate::rules::RuleTable;
    use rust_decimal::Decimal;

    #[test]
    fn test_builtin_rules_compile() {
        for provider in all() {
            let table = RuleTable::new(provider.rules.clone()).unwrap();
            assert_eq!(table.len(), provider.rules.len(), "{}", provider.info.title);
        }
    }

    #[test]
    fn test_aj_price_list() {
        let html = r#"
        <ul>
        <li id="iphone">
            <article class="product iphone7">
                <ul>
                    <li>iPhone 7 / 7 Plus</li>
                    <li>iPhone 7 32GB Black руб<span>39 990</span></li>
                    <li>iPhone 7 Plus 128GB Rose Gold руб<span>64 990</span><span>59 990</span></li>
                    <li> </li>
                </ul>
            </article>
        </li>
        </ul>
        "#;
        let table = RuleTable::new(aj().rules).unwrap();
        let rules = table.resolve(&[ProductType::Iphone7, ProductType::Iphone7Plus]);

        let products = extract_page(html, &rules);
        assert_eq!(products.len(), 2);

        assert_eq!(products[0].title, "iPhone 7 32GB Black");
        assert_eq!(products[0].description, "iPhone 7 / 7 Plus");
        assert_eq!(products[0].price, Some(Decimal::from(39990)));
        assert_eq!(products[0].parameters, "color=Black;storage=32GB");

        assert_eq!(products[1].product_type, ProductType::Iphone7Plus);
        assert_eq!(products[1].title, "iPhone 7 Plus 128GB Rose Gold");
        assert_eq!(products[1].price, Some(Decimal::from(59990)));
        assert_eq!(products[1].parameters, "color=Rose Gold;storage=128GB");
    }

    #[test]
    fn test_citilink_listing() {
        let html = r#"
        <div id="subcategoryList">
            <div class="block">
                <div class="row">
                    <div data-params='{"id": 1, "shortName": "iPhone SE 32Gb, Gold, MP842RU/A", "price": 19990}'>iPhone SE</div>
                    <div data-params='{"id": 2, "shortName": "iPhone SE 128Gb, Space Gray, MP862RU/A", "price": 25990}'>iPhone SE</div>
                    <div data-params='{"id": 3, "shortName": "Apple Watch S3"}'>Apple Watch</div>
                    <div class="banner">Credit 0%</div>
                </div>
            </div>
        </div>
        "#;
        let table = RuleTable::new(citilink_spb().rules).unwrap();
        let products = extract_page(html, &table.resolve(&ProductType::ALL));

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title, "iPhone SE 32Gb");
        assert_eq!(products[0].description, "MP842RU/A");
        assert_eq!(products[0].parameters, "storage=32Gb");
        assert_eq!(products[1].title, "iPhone SE 128Gb");
        assert_eq!(products[1].price, Some(Decimal::from(25990)));
    }
}
