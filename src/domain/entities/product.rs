//! Static product catalog - the Chaser 30 ml flavor range

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Stable product identifier, also used as the stock/cart key
pub type ProductId = u32;

/// Promotional label shown in front of a flavor name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductTag {
    New,
    Limited,
}

impl fmt::Display for ProductTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductTag::New => write!(f, "NEW"),
            ProductTag::Limited => write!(f, "LIMITED"),
        }
    }
}

/// A catalog item. The catalog is compiled in and immutable at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: &'static str,
    pub tag: Option<ProductTag>,
    pub description: &'static str,
}

impl Product {
    /// Display name with the tag prefix, e.g. `[NEW] ЧЕРЕШНЯ`
    pub fn tagged_name(&self) -> String {
        match self.tag {
            Some(tag) => format!("[{}] {}", tag, self.name),
            None => self.name.to_string(),
        }
    }
}

/// The full flavor range, in menu order
pub const CATALOG: &[Product] = &[
    Product {
        id: 1,
        name: "ЧЕРЕШНЯ",
        tag: Some(ProductTag::New),
        description: "Солодка черешня з м'яким ягідним післясмаком.",
    },
    Product {
        id: 2,
        name: "ГРЕЙПФРУТ",
        tag: Some(ProductTag::Limited),
        description: "Освіжаючий гіркуватий грейпфрут з легкою кислинкою.",
    },
    Product {
        id: 3,
        name: "КАКТУС",
        tag: Some(ProductTag::Limited),
        description: "Екзотичний кактус із прохолодною солодкістю.",
    },
    Product {
        id: 4,
        name: "ЛІЧІ",
        tag: Some(ProductTag::Limited),
        description: "Ніжний лічі з квітковими нотами.",
    },
    Product {
        id: 5,
        name: "ВИНОГРАД",
        tag: None,
        description: "Соковитий виноград із класичною солодкістю.",
    },
    Product {
        id: 6,
        name: "ВИШНЯ",
        tag: None,
        description: "Яскрава вишня з балансом кислинки та цукру.",
    },
    Product {
        id: 7,
        name: "ВИШНЯ МЕНТОЛ",
        tag: None,
        description: "Вишня з прохолодним ментоловим шлейфом.",
    },
    Product {
        id: 8,
        name: "ГРАНАТ",
        tag: None,
        description: "Насичений гранат з терпкими нотами.",
    },
    Product {
        id: 9,
        name: "ДИНЯ",
        tag: None,
        description: "Медова диня з м'якою фруктовою солодкістю.",
    },
    Product {
        id: 10,
        name: "ЖОВТА МАЛИНА",
        tag: None,
        description: "Жовта малина з ніжною ягідною кислинкою.",
    },
    Product {
        id: 11,
        name: "ЖОВТА ЧЕРЕШНЯ",
        tag: None,
        description: "Стигла жовта черешня з карамельним відтінком.",
    },
    Product {
        id: 12,
        name: "ЖОВТИЙ ДРАГОНФРУТ",
        tag: None,
        description: "Жовтий драгонфрут з тропічною свіжістю.",
    },
    Product {
        id: 13,
        name: "КАВУН",
        tag: None,
        description: "Свіжий кавун з соковитою літньою солодкістю.",
    },
    Product {
        id: 14,
        name: "КАВУН МЕНТОЛ",
        tag: None,
        description: "Кавун із прохолодним ментоловим ефектом.",
    },
    Product {
        id: 15,
        name: "ЛИМОН",
        tag: None,
        description: "Яскравий лимон з виразною цитрусовою кислинкою.",
    },
    Product {
        id: 16,
        name: "КІВІ",
        tag: None,
        description: "Свіжий ківі з тропічною кисло-солодкою нотою.",
    },
    Product {
        id: 17,
        name: "М'ЯТА",
        tag: None,
        description: "Чиста м'ята з прохолодним фінішем.",
    },
    Product {
        id: 18,
        name: "ПЕРСИК",
        tag: None,
        description: "Соковитий персик з оксамитовою солодкістю.",
    },
    Product {
        id: 19,
        name: "ПОЛУНИЦЯ",
        tag: None,
        description: "Класична полуниця з приємною ягідною солодкістю.",
    },
    Product {
        id: 20,
        name: "СМОРОДИНА МЕНТОЛ",
        tag: None,
        description: "Чорна смородина з прохолодним ментоловим акцентом.",
    },
    Product {
        id: 21,
        name: "ЯГОДИ",
        tag: None,
        description: "Мікс ягід з соковитим ароматом.",
    },
];

static CATALOG_INDEX: Lazy<HashMap<ProductId, &'static Product>> =
    Lazy::new(|| CATALOG.iter().map(|p| (p.id, p)).collect());

/// Look up a product by id
pub fn find_product(id: ProductId) -> Option<&'static Product> {
    CATALOG_INDEX.get(&id).copied()
}

/// Name for a product id, falling back to the raw id for unknown entries
pub fn product_name(id: ProductId) -> String {
    find_product(id)
        .map(|p| p.name.to_string())
        .unwrap_or_else(|| format!("#{}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique_and_indexed() {
        assert_eq!(CATALOG.len(), CATALOG_INDEX.len());
        for product in CATALOG {
            assert_eq!(find_product(product.id), Some(product));
        }
    }

    #[test]
    fn tagged_name_includes_label() {
        assert_eq!(find_product(1).unwrap().tagged_name(), "[NEW] ЧЕРЕШНЯ");
        assert_eq!(find_product(5).unwrap().tagged_name(), "ВИНОГРАД");
    }

    #[test]
    fn unknown_product_falls_back_to_id() {
        assert_eq!(find_product(99), None);
        assert_eq!(product_name(99), "#99");
    }
}
