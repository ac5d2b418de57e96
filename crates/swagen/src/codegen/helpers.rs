use handlebars::{Handlebars, handlebars_helper};

use crate::utils::text::{camel_case, interface_name, upper_snake_case};

handlebars_helper!(camel_case_helper: |value: str| camel_case(value));
handlebars_helper!(interface_case_helper: |value: str| interface_name(value));
handlebars_helper!(upper_snake_case_helper: |value: str| upper_snake_case(value));

/// Identifier helpers available to every template: `camelCase`, `interfaceCase`, `upperSnakeCase`.
pub(crate) fn register_helpers(handlebars: &mut Handlebars<'_>) {
  handlebars.register_helper("camelCase", Box::new(camel_case_helper));
  handlebars.register_helper("interfaceCase", Box::new(interface_case_helper));
  handlebars.register_helper("upperSnakeCase", Box::new(upper_snake_case_helper));
}
