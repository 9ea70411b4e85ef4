//! GraphQL query definitions for the Magento API.
//!
//! Each query is a marker type implementing [`GraphQLQuery`] with a module
//! of the same name (snake case) holding its `Variables` and `ResponseData`.
//! User input only ever travels in variables, never in the document text.

use graphql_client::{GraphQLQuery, QueryBody};

/// Category tree below a parent category, three levels deep.
pub struct CategoryTree;

pub mod category_tree {
    use serde::{Deserialize, Serialize};

    use crate::magento::types::CategoryResult;

    pub const OPERATION_NAME: &str = "CategoryTree";
    pub const QUERY: &str = r"
query CategoryTree($parentId: String!) {
  categories(filters: { parent_id: { eq: $parentId } }) {
    total_count
    items {
      ...CategoryFields
      children {
        ...CategoryFields
        children {
          ...CategoryFields
        }
      }
    }
  }
}

fragment CategoryFields on CategoryTree {
  uid
  name
  level
  path
  children_count
  include_in_menu
}
";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub parent_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub categories: Option<CategoryResult>,
    }
}

impl GraphQLQuery for CategoryTree {
    type Variables = category_tree::Variables;
    type ResponseData = category_tree::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: category_tree::QUERY,
            operation_name: category_tree::OPERATION_NAME,
        }
    }
}

/// Products assigned to a category.
pub struct ProductsByCategory;

pub mod products_by_category {
    use serde::{Deserialize, Serialize};

    use crate::magento::types::ProductResult;

    pub const OPERATION_NAME: &str = "ProductsByCategory";
    pub const QUERY: &str = r"
query ProductsByCategory($categoryUid: String!, $pageSize: Int!) {
  products(filter: { category_uid: { eq: $categoryUid } }, pageSize: $pageSize) {
    total_count
    items {
      sku
      name
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub category_uid: String,
        pub page_size: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Option<ProductResult>,
    }
}

impl GraphQLQuery for ProductsByCategory {
    type Variables = products_by_category::Variables;
    type ResponseData = products_by_category::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: products_by_category::QUERY,
            operation_name: products_by_category::OPERATION_NAME,
        }
    }
}

/// Full-text product search.
pub struct SearchProducts;

pub mod search_products {
    use serde::{Deserialize, Serialize};

    use crate::magento::types::ProductResult;

    pub const OPERATION_NAME: &str = "SearchProducts";
    pub const QUERY: &str = r"
query SearchProducts($search: String!, $pageSize: Int!) {
  products(search: $search, pageSize: $pageSize) {
    total_count
    items {
      sku
      name
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub search: String,
        pub page_size: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Option<ProductResult>,
    }
}

impl GraphQLQuery for SearchProducts {
    type Variables = search_products::Variables;
    type ResponseData = search_products::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: search_products::QUERY,
            operation_name: search_products::OPERATION_NAME,
        }
    }
}

/// Cheapest possible round trip.
pub struct Ping;

pub mod ping {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "Ping";
    pub const QUERY: &str = "query Ping { __typename }";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        #[serde(rename = "__typename")]
        pub typename: String,
    }
}

impl GraphQLQuery for Ping {
    type Variables = ping::Variables;
    type ResponseData = ping::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: ping::QUERY,
            operation_name: ping::OPERATION_NAME,
        }
    }
}
