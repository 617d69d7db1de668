use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, Error, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::dim::Dimension;
use crate::dtype::Element;
use crate::NdArray;

impl<T, D: Dimension> Serialize for NdArray<T, D>
where
    T: Element + Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        let mut array = serializer.serialize_struct("NdArray", 2)?;
        array.serialize_field("shape", self.shape())?;
        array.serialize_field("data", &self.to_vec())?;
        array.end()
    }
}

struct ArrayVisitor<T, D> {
    data_marker: PhantomData<T>,
    dim_marker: PhantomData<D>,
}

impl<'de, T, D> Visitor<'de> for ArrayVisitor<T, D>
where
    T: Element + Deserialize<'de>,
    D: Dimension,
{
    type Value = NdArray<T, D>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an array with \"shape\" and \"data\" fields")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut data: Option<Vec<T>> = None;
        let mut shape: Option<Vec<usize>> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "data" => {
                    if data.is_some() {
                        return Err(A::Error::duplicate_field("data"));
                    }
                    data = Some(map.next_value()?);
                }
                "shape" => {
                    if shape.is_some() {
                        return Err(A::Error::duplicate_field("shape"));
                    }
                    shape = Some(map.next_value()?);
                }
                _ => {
                    return Err(A::Error::unknown_field(&key, &["data", "shape"]));
                }
            }
        }

        let Some(shape) = shape else {
            return Err(A::Error::missing_field("shape"));
        };
        let Some(data) = data else {
            return Err(A::Error::missing_field("data"));
        };

        let array = NdArray::<T, _>::from_data(shape, data)
            .map_err(|_| A::Error::custom("data length does not match shape product"))?;
        array
            .into_dim()
            .map_err(|_| A::Error::custom("incorrect shape length for array rank"))
    }
}

impl<'de, T, D> Deserialize<'de> for NdArray<T, D>
where
    T: Element + Deserialize<'de>,
    D: Dimension,
{
    fn deserialize<De>(deserializer: De) -> Result<NdArray<T, D>, De::Error>
    where
        De: Deserializer<'de>,
    {
        deserializer.deserialize_struct(
            "NdArray",
            &["shape", "data"],
            ArrayVisitor::<T, D> {
                data_marker: PhantomData,
                dim_marker: PhantomData,
            },
        )
    }
}
