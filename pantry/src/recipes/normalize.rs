//! Coercing recipe JSON of any reasonable shape into [`Recipe`].
//!
//! Accepts both the writer prompt's shape (`title`, `ingredients`, `instructions`,
//! `grocery_list`, `calories`) and Spoonacular's (`image`, `extendedIngredients`,
//! `analyzedInstructions`, `missedIngredients`, `nutrition`).

use serde_json::{Map, Value};

use crate::extract::parse_json_lenient;
use crate::state::{Recipe, DEFAULT_RECIPE_TITLE};

/// Builds a recipe from one JSON object; `None` when `value` is not an object.
///
/// `have` is the user's ingredient list, used to derive a grocery list when the
/// source has none.
pub fn normalize_recipe(value: &Value, have: &[String]) -> Option<Recipe> {
    let obj = value.as_object()?;

    let title = first_text(obj, &["title", "name"])
        .unwrap_or_else(|| DEFAULT_RECIPE_TITLE.to_string());
    let image_url = first_text(obj, &["image_url", "image"]);
    let source_url = first_text(obj, &["source_url", "sourceUrl", "url"]);

    let mut ingredients = first_list(obj, &["ingredients", "extendedIngredients"]);
    if ingredients.is_empty() {
        ingredients = ["usedIngredients", "missedIngredients"]
            .iter()
            .flat_map(|k| obj.get(*k).map(text_list).unwrap_or_default())
            .collect();
    }

    let mut instructions = obj
        .get("analyzedInstructions")
        .map(analyzed_steps)
        .unwrap_or_default();
    if instructions.is_empty() {
        instructions = first_list(obj, &["instructions", "steps"]);
    }

    let mut grocery_list = first_list(obj, &["grocery_list", "shopping_list"]);
    if grocery_list.is_empty() {
        grocery_list = obj
            .get("missedIngredients")
            .map(ingredient_names)
            .unwrap_or_default();
    }
    if grocery_list.is_empty() && !have.is_empty() {
        grocery_list = ingredients
            .iter()
            .filter(|line| !mentions_any(line, have))
            .cloned()
            .collect();
    }

    let calories = obj
        .get("calories")
        .and_then(number_in)
        .or_else(|| obj.get("nutrition").and_then(calories_from_nutrition));

    Some(Recipe {
        title,
        image_url,
        source_url,
        ingredients,
        instructions,
        grocery_list,
        calories,
    })
}

/// Recipes from an already-parsed value: an array, a `{"recipes": [...]}` or
/// `{"results": [...]}` wrapper, or a single recipe object.
pub fn recipes_from_value(value: &Value, have: &[String]) -> Vec<Recipe> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| normalize_recipe(v, have))
            .collect(),
        Value::Object(obj) => match ["recipes", "results"]
            .iter()
            .find_map(|k| obj.get(*k).filter(|v| v.is_array()))
        {
            Some(list) => recipes_from_value(list, have),
            None => normalize_recipe(value, have).into_iter().collect(),
        },
        _ => Vec::new(),
    }
}

/// Recipes from model text. JSON (fenced, wrapped in prose, or slightly broken) is
/// parsed; plain prose becomes a single recipe whose first line is the title.
pub fn recipes_from_text(text: &str, have: &[String]) -> Vec<Recipe> {
    if let Some(value) = parse_json_lenient(text) {
        let recipes = recipes_from_value(&value, have);
        if !recipes.is_empty() {
            return recipes;
        }
    }
    let mut lines = text
        .lines()
        .map(|l| l.trim().trim_start_matches(['#', '*', '-']).trim())
        .filter(|l| !l.is_empty());
    let Some(first) = lines.next() else {
        return Vec::new();
    };
    let (title, rest): (String, Vec<String>) = if first.chars().count() <= 80 {
        (first.trim_end_matches(':').to_string(), lines.map(String::from).collect())
    } else {
        (
            DEFAULT_RECIPE_TITLE.to_string(),
            std::iter::once(first).chain(lines).map(String::from).collect(),
        )
    };
    vec![Recipe {
        title,
        instructions: rest,
        ..Recipe::default()
    }]
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| {
        obj.get(*k)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
            .map(String::from)
    })
}

fn first_list(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .map(|k| obj.get(*k).map(text_list).unwrap_or_default())
        .find(|l| !l.is_empty())
        .unwrap_or_default()
}

/// Scalar or list to list. Objects contribute their `original` / `name` / `step` text.
fn text_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(item_text).collect(),
        Value::String(s) => s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect(),
        other => item_text(other).into_iter().collect(),
    }
}

fn item_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(o) => ["original", "originalString", "step", "name"]
            .iter()
            .find_map(|k| o.get(*k).and_then(Value::as_str))?
            .trim()
            .to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn ingredient_names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| match v {
                    Value::Object(o) => o.get("name").and_then(Value::as_str).map(String::from),
                    other => item_text(other),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn analyzed_steps(value: &Value) -> Vec<String> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|block| block.get("steps").and_then(Value::as_array))
        .flatten()
        .filter_map(|s| s.get("step").and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Whole, non-negative number from a JSON number or the leading digits of a string ("350 kcal").
fn number_in(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|f| *f >= 0.0 && *f <= u32::MAX as f64)
            .map(|f| f.round() as u32),
        Value::String(s) => {
            let digits: String = s
                .trim()
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

fn calories_from_nutrition(value: &Value) -> Option<u32> {
    value
        .get("nutrients")?
        .as_array()?
        .iter()
        .find(|n| {
            n.get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.eq_ignore_ascii_case("calories"))
        })
        .and_then(|n| n.get("amount"))
        .and_then(number_in)
}

fn mentions_any(line: &str, have: &[String]) -> bool {
    let line = line.to_lowercase();
    have.iter()
        .map(|h| h.trim().to_lowercase())
        .any(|h| !h.is_empty() && line.contains(&h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn have(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn writer_shape_is_read_directly() {
        let v = json!({
            "title": "Fried rice",
            "image_url": "http://img/1.jpg",
            "ingredients": ["2 cups rice", "1 egg"],
            "instructions": ["Cook rice.", "Fry egg."],
            "grocery_list": ["soy sauce"],
            "calories": 420
        });
        let r = normalize_recipe(&v, &[]).unwrap();
        assert_eq!(r.title, "Fried rice");
        assert_eq!(r.image_url.as_deref(), Some("http://img/1.jpg"));
        assert_eq!(r.ingredients, vec!["2 cups rice", "1 egg"]);
        assert_eq!(r.instructions, vec!["Cook rice.", "Fry egg."]);
        assert_eq!(r.grocery_list, vec!["soy sauce"]);
        assert_eq!(r.calories, Some(420));
    }

    #[test]
    fn missing_fields_get_defaults_and_scalars_become_lists() {
        let v = json!({"instructions": "Boil water.\nAdd pasta.", "calories": "350 kcal"});
        let r = normalize_recipe(&v, &[]).unwrap();
        assert_eq!(r.title, DEFAULT_RECIPE_TITLE);
        assert_eq!(r.instructions, vec!["Boil water.", "Add pasta."]);
        assert!(r.ingredients.is_empty());
        assert_eq!(r.calories, Some(350));
    }

    #[test]
    fn spoonacular_shape_is_mapped() {
        let v = json!({
            "id": 7,
            "title": "Tomato soup",
            "image": "https://spoonacular.com/7.jpg",
            "sourceUrl": "https://example.org/soup",
            "extendedIngredients": [
                {"name": "tomato", "original": "4 tomatoes"},
                {"name": "cream", "original": "1/2 cup cream"}
            ],
            "missedIngredients": [{"name": "cream", "original": "1/2 cup cream"}],
            "analyzedInstructions": [
                {"name": "", "steps": [{"number": 1, "step": "Chop."}, {"number": 2, "step": "Simmer."}]}
            ],
            "nutrition": {"nutrients": [{"name": "Fat", "amount": 3.0}, {"name": "Calories", "amount": 210.4}]}
        });
        let r = normalize_recipe(&v, &have(&["tomato"])).unwrap();
        assert_eq!(r.image_url.as_deref(), Some("https://spoonacular.com/7.jpg"));
        assert_eq!(r.source_url.as_deref(), Some("https://example.org/soup"));
        assert_eq!(r.ingredients, vec!["4 tomatoes", "1/2 cup cream"]);
        assert_eq!(r.instructions, vec!["Chop.", "Simmer."]);
        assert_eq!(r.grocery_list, vec!["cream"]);
        assert_eq!(r.calories, Some(210));
    }

    #[test]
    fn grocery_list_derived_from_user_ingredients() {
        let v = json!({"title": "Omelette", "ingredients": ["3 Eggs", "1 tbsp butter", "salt"]});
        let r = normalize_recipe(&v, &have(&["eggs", "salt"])).unwrap();
        assert_eq!(r.grocery_list, vec!["1 tbsp butter"]);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(normalize_recipe(&json!("text"), &[]).is_none());
    }

    #[test]
    fn recipes_from_value_accepts_wrappers() {
        let list = json!({"recipes": [{"title": "A"}, "junk", {"title": "B"}]});
        let titles: Vec<_> = recipes_from_value(&list, &[])
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(recipes_from_value(&json!({"title": "C"}), &[]).len(), 1);
    }

    #[test]
    fn recipes_from_fenced_text() {
        let text = "Here you go:\n```json\n[{\"title\": \"Stew\", \"ingredients\": \"beef\"}]\n```";
        let recipes = recipes_from_text(text, &[]);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Stew");
        assert_eq!(recipes[0].ingredients, vec!["beef"]);
    }

    #[test]
    fn prose_becomes_single_recipe() {
        let text = "## Garlic pasta:\n- Boil pasta.\n- Toss with garlic oil.";
        let recipes = recipes_from_text(text, &[]);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Garlic pasta");
        assert_eq!(recipes[0].instructions, vec!["Boil pasta.", "Toss with garlic oil."]);
    }

    #[test]
    fn empty_text_gives_nothing() {
        assert!(recipes_from_text("   \n ", &[]).is_empty());
    }
}
