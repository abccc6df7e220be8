/// Implements [`Reflect`](crate::reflect::Reflect) and
/// [`Structured`](crate::reflect::Structured) for a struct with named fields.
///
/// Every field type must implement [`FieldType`](crate::reflect::FieldType)
/// and the struct must implement `Default`, which serves as the blank
/// instance during reconstruction. Members are listed in declaration order.
///
/// A literal member whose text is exactly `\N` cannot be told apart from
/// null, so [`Mapper::to_map`](crate::Mapper::to_map) rejects it.
///
/// ```
/// use mapgraph_core::reflect::{ObjectRef, Reflect};
/// use mapgraph_core::{reflect_struct, Value};
///
/// #[derive(Debug, Default)]
/// struct Node {
///     label: String,
///     next: Option<ObjectRef>,
/// }
/// reflect_struct!("list.Node", Node { label: String, next: Option<ObjectRef> });
///
/// let mut node = Node::default();
/// node.set_field("label", Value::from("head")).unwrap();
/// assert_eq!(node.field("label"), Some(Value::from("head")));
/// assert_eq!(node.field("next"), Some(Value::Null));
/// assert!(node.set_field("label", Value::I32(1)).is_err());
/// ```
#[macro_export]
macro_rules! reflect_struct {
    ($name:literal, $ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::reflect::Reflect for $ty {
            fn type_name(&self) -> &str {
                $name
            }

            fn field(&self, name: &str) -> ::std::option::Option<$crate::Value> {
                $(
                    if name == ::std::stringify!($field) {
                        return ::std::option::Option::Some(
                            $crate::reflect::FieldType::to_value(&self.$field),
                        );
                    }
                )*
                ::std::option::Option::None
            }

            fn set_field(&mut self, name: &str, value: $crate::Value) -> $crate::Result<()> {
                $(
                    if name == ::std::stringify!($field) {
                        let found = value.kind();
                        return match <$fty as $crate::reflect::FieldType>::from_value(value) {
                            ::std::option::Option::Some(v) => {
                                self.$field = v;
                                ::std::result::Result::Ok(())
                            }
                            ::std::option::Option::None => {
                                ::std::result::Result::Err($crate::MapError::FieldType {
                                    type_name: $name.to_string(),
                                    field: name.to_string(),
                                    expected: <$fty as $crate::reflect::FieldType>::type_desc()
                                        .to_string(),
                                    found: found.to_string(),
                                })
                            }
                        };
                    }
                )*
                let _ = value;
                ::std::result::Result::Err($crate::MapError::UnknownField {
                    type_name: $name.to_string(),
                    field: name.to_string(),
                })
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }

        impl $crate::reflect::Structured for $ty {
            const TYPE_NAME: &'static str = $name;

            fn structure() -> $crate::reflect::Structure {
                $crate::reflect::Structure::new($name)
                    $(
                        .field(
                            ::std::stringify!($field),
                            <$fty as $crate::reflect::FieldType>::type_desc(),
                        )
                    )*
                    .with_allocator(|| {
                        $crate::reflect::ObjectRef::new(<$ty as ::std::default::Default>::default())
                    })
            }
        }
    };
}

/// Implements [`ReflectEnum`](crate::reflect::ReflectEnum) and
/// [`FieldType`](crate::reflect::FieldType) for a fieldless enum.
///
/// ```
/// use mapgraph_core::reflect::{FieldType, ReflectEnum};
/// use mapgraph_core::reflect_enum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Suit {
///     Hearts,
///     Spades,
/// }
/// reflect_enum!("cards.Suit", Suit { Hearts, Spades });
///
/// assert_eq!(Suit::variants(), &["Hearts", "Spades"]);
/// assert_eq!(Suit::from_value(Suit::Spades.to_value()), Some(Suit::Spades));
/// ```
#[macro_export]
macro_rules! reflect_enum {
    ($name:literal, $ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::reflect::ReflectEnum for $ty {
            const TYPE_NAME: &'static str = $name;

            fn variants() -> &'static [&'static str] {
                &[$(::std::stringify!($variant)),+]
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    $($ty::$variant => ::std::stringify!($variant),)+
                }
            }

            fn from_variant(name: &str) -> ::std::option::Option<Self> {
                $(
                    if name == ::std::stringify!($variant) {
                        return ::std::option::Option::Some($ty::$variant);
                    }
                )+
                ::std::option::Option::None
            }
        }

        impl $crate::reflect::FieldType for $ty {
            fn type_desc() -> $crate::TypeDesc {
                $crate::TypeDesc::scalar($name)
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Enum($crate::value::EnumValue::new(
                    $name,
                    $crate::reflect::ReflectEnum::variant_name(self),
                ))
            }

            fn from_value(value: $crate::Value) -> ::std::option::Option<Self> {
                match value {
                    $crate::Value::Enum(e) if e.type_name == $name => {
                        <$ty as $crate::reflect::ReflectEnum>::from_variant(&e.variant)
                    }
                    _ => ::std::option::Option::None,
                }
            }
        }
    };
}
